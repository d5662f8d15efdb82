//! Test fixtures and data factories
//!
//! All factories create real objects, not mocks.

use chrono::Utc;
use std::sync::Arc;
use ton_auth::auth::credentials::hash_password;
use ton_auth::auth::jwt::ManualClock;
use ton_auth::auth::{Principal, TokenService, UserRecord};
use ton_auth::config::AuthConfig;

/// Fixed start time for clock-driven tests
pub const START: u64 = 1_700_000_000;

pub const SECRET: &str = "integration-secret-0123456789-abcdefghijklmnop";

pub const PASSWORD: &str = "workshop-password-42";

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: SECRET.to_string(),
        issuer: "ton-platform".to_string(),
        access_token_ttl: 15 * 60,
        refresh_token_ttl: 7 * 24 * 3600,
        refresh_grace: 7 * 24 * 3600,
        ..AuthConfig::default()
    }
}

/// Token service reading a manual clock set to [`START`]
pub fn token_service() -> (Arc<TokenService>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START));
    let service =
        TokenService::with_clock(&auth_config(), clock.clone()).expect("fixture config is valid");
    (Arc::new(service), clock)
}

/// Factory for principals
pub struct PrincipalFactory;

impl PrincipalFactory {
    pub fn with_role(user_id: u64, role: &str) -> Principal {
        Principal::new(
            user_id,
            format!("user{}", user_id),
            format!("user{}@example.com", user_id),
            role,
        )
    }
}

/// Factory for directory records
pub struct UserFactory;

impl UserFactory {
    /// Active user whose password is [`PASSWORD`]
    pub fn create(id: u64, role: &str) -> UserRecord {
        UserRecord {
            id,
            username: format!("user{}", id),
            email: format!("user{}@example.com", id),
            first_name: "Test".to_string(),
            last_name: format!("User{}", id),
            role: role.to_string(),
            password_hash: hash_password(PASSWORD).expect("hashing succeeds"),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn inactive(id: u64, role: &str) -> UserRecord {
        UserRecord {
            is_active: false,
            ..Self::create(id, role)
        }
    }
}
