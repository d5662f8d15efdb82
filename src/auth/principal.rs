//! Authenticated identity threaded from token validation to the guard

use serde::{Deserialize, Serialize};

use super::jwt::Claims;

/// Identity resolved from a validated access token.
///
/// Built once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: u64,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl Principal {
    pub fn new(
        user_id: u64,
        username: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            email: email.into(),
            role: role.into(),
        }
    }
}

impl From<&Claims> for Principal {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username.clone(),
            email: claims.email.clone(),
            role: claims.role.clone(),
        }
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            email: claims.email,
            role: claims.role,
        }
    }
}
