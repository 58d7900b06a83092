pub mod backend;
pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod password;
pub mod registration;
pub mod search;
pub mod ui;

pub use error::{AppError, Result};
