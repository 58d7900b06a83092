//! Hosted backend access: password auth, sessions, and table queries.

pub mod auth;
pub mod client;
pub mod query;
pub mod session;

pub use auth::AuthUser;
pub use client::BackendClient;
pub use query::QueryBuilder;
pub use session::{Session, SessionStore, ensure_fresh};
