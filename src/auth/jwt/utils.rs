//! JWT utility functions

use super::types::{Claims, TokenService, TokenStatus};
use crate::auth::error::{AuthError, TokenError};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};

/// Map a decoding failure onto the token error taxonomy
pub(super) fn classify(error: &JwtError) -> TokenError {
    match error.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm => TokenError::WrongAlgorithm,
        ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
        ErrorKind::ImmatureSignature => TokenError::NotYetValid,
        _ => TokenError::Malformed,
    }
}

impl TokenService {
    /// Classify a token without failing.
    ///
    /// Only a verified token whose `exp` has passed is `Expired`; every other
    /// failure is `Invalid`.
    pub fn token_status(&self, token: &str) -> TokenStatus {
        match self.validate(token) {
            Ok(_) => TokenStatus::Active,
            Err(AuthError::ExpiredToken) => TokenStatus::Expired,
            Err(AuthError::InvalidToken(kind)) => TokenStatus::Invalid(kind),
            Err(_) => TokenStatus::Invalid(TokenError::Malformed),
        }
    }

    /// True only when the token verifies but is past `exp`
    pub fn is_expired(&self, token: &str) -> bool {
        self.token_status(token) == TokenStatus::Expired
    }

    pub fn is_usable(&self, token: &str) -> bool {
        self.token_status(token) == TokenStatus::Active
    }

    /// Seconds until `exp`, or `None` once expired
    pub fn time_until_expiry(&self, claims: &Claims) -> Option<u64> {
        let now = self.clock.now();
        claims.exp.checked_sub(now).filter(|remaining| *remaining > 0)
    }

    /// Access token lifetime in seconds
    pub fn access_ttl(&self) -> u64 {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> u64 {
        self.refresh_ttl
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}
