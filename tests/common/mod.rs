//! Common test utilities for ton-auth
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::fixtures;
//!
//! #[test]
//! fn my_test() {
//!     let (tokens, clock) = fixtures::token_service();
//!     // ...
//! }
//! ```

pub mod fixtures;

pub use fixtures::{PrincipalFactory, UserFactory};
