//! Shared types for the cookbook auth session lifecycle.

pub mod route;
pub mod session;

pub use route::Route;
pub use session::{AuthMode, Credentials, PersistedSession, Session};
