//! Data models for admins, staff, and registration history.

pub mod admin;
pub mod history;
pub mod role;
pub mod staff;

pub use admin::{Admin, AdminProfile, NewProfile};
pub use history::{AdminHistoryEntry, NewHistoryEntry};
pub use role::Role;
pub use staff::{Staff, generate_staff_id};
