pub mod api;
pub mod auth;
pub mod customers;
pub mod ui;
pub mod utils;
