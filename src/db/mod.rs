//! Table access through the hosted REST backend.

pub mod admin;
pub mod history;
pub mod staff;
