pub mod account;
pub mod gate;
pub mod password;
pub mod reset_flow;
pub mod session;
pub mod store;
