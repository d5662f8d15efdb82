//! Configuration data models

#![allow(missing_docs)]

pub mod auth;
pub mod logging;

pub use auth::*;
pub use logging::*;
