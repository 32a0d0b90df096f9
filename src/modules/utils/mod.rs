pub mod interval;
pub mod io;
pub mod logging;
pub mod time;
pub mod validate;
