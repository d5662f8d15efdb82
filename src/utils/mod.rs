//! Utility modules
//!
//! - **error**: process-level error type and serializable error bodies
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;

pub use error::{ErrorResponse, PlatformError, Result};
pub use logging::init_logging;
