//! # ton-auth
//!
//! Authentication and authorization core for a multi-tenant fleet and
//! workshop operations platform.
//!
//! - Signed session tokens with a refresh grace window
//! - A closed permission catalog and a static role table
//! - An authorization guard that falls back to persisted grants and
//!   checks resource ownership
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ton_auth::auth::rbac::{Action, NoDynamicPermissions, Resource};
//! use ton_auth::{AuthSystem, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let auth = AuthSystem::new(config.auth(), Arc::new(NoDynamicPermissions))?;
//!
//!     let pair = auth.tokens().issue_token_pair(7, "dana", "Mechanic", "dana@example.com")?;
//!     let header = format!("Bearer {}", pair.access_token);
//!
//!     let principal = auth.authenticate(Some(&header))?;
//!     auth.authorize(&principal, Resource::WorkOrder, Action::Update).await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod utils;

// Re-export main types
pub use auth::{AuthError, AuthService, AuthSystem, Principal, TokenService};
pub use config::Config;
pub use utils::error::{PlatformError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
