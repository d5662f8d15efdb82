//! Integration tests for ton-auth
//!
//! These tests verify the interaction between the token service, the
//! authorization guard and configuration through the public API.

pub mod authorization_tests;
pub mod config_tests;
pub mod token_flow_tests;
