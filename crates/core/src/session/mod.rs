//! Operator session
//!
//! Tracks whether the operator is logged in and as whom. Credentials are not
//! checked against any backend: any non-empty email and password pair logs in.

mod manager;
mod model;

pub use manager::SessionManager;
pub use model::{Session, SessionUser};
