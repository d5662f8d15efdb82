//! Error handling for the platform core
//!
//! [`PlatformError`] covers startup, configuration and collaborator failures.
//! Request-time outcomes use [`crate::auth::AuthError`] and are rendered with
//! [`ErrorResponse`].

mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{PlatformError, Result};
