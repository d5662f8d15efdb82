//! JWT types and data structures

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::clock::Clock;
use crate::auth::error::TokenError;

/// Issues, validates and refreshes signed session tokens.
///
/// Keys and lifetimes are fixed at construction; the service is shared
/// across requests without locking.
#[derive(Clone)]
pub struct TokenService {
    /// Encoding key for signing tokens
    pub(super) encoding_key: EncodingKey,
    /// Decoding key for verifying tokens
    pub(super) decoding_key: DecodingKey,
    /// Algorithm used when signing
    pub(super) algorithm: Algorithm,
    /// Access token lifetime in seconds
    pub(super) access_ttl: u64,
    /// Refresh token lifetime in seconds
    pub(super) refresh_ttl: u64,
    /// Seconds past `exp` during which a refresh token is still honoured
    pub(super) refresh_grace: u64,
    /// Token issuer
    pub(super) issuer: String,
    pub(super) clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("refresh_grace", &self.refresh_grace)
            .field("issuer", &self.issuer)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub username: String,
    pub role: String,
    pub email: String,
    /// Issued at timestamp
    pub iat: u64,
    /// Not before timestamp
    pub nbf: u64,
    /// Expiration timestamp
    pub exp: u64,
    /// Issuer
    pub iss: String,
    /// JWT ID
    pub jti: String,
    pub token_type: TokenType,
}

/// Token type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token presented on every request
    Access,
    /// Long-lived token exchanged for a new pair
    Refresh,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Access => f.write_str("access"),
            TokenType::Refresh => f.write_str("refresh"),
        }
    }
}

/// Token pair (access + refresh)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Access token expiry
    pub expires_at: DateTime<Utc>,
    /// Access token lifetime in seconds
    pub expires_in: u64,
}

/// Outcome of a lenient token inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    Active,
    Expired,
    Invalid(TokenError),
}
