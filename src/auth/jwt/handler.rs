//! Core token service implementation

use super::clock::{Clock, SystemClock};
use super::types::{Claims, TokenPair, TokenService, TokenType};
use crate::auth::error::{AuthError, TokenError};
use crate::config::AuthConfig;
use crate::utils::error::{PlatformError, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Identity fields written into both tokens of a pair
#[derive(Debug, Clone, Copy)]
pub(super) struct Subject<'a> {
    pub user_id: u64,
    pub username: &'a str,
    pub role: &'a str,
    pub email: &'a str,
}

impl TokenService {
    /// Create a token service reading the system clock
    pub fn new(config: &AuthConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a token service with an explicit time source
    pub fn with_clock(config: &AuthConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config
            .validate()
            .map_err(|e| PlatformError::config(format!("Token service: {}", e)))?;
        let algorithm = config.algorithm().map_err(PlatformError::config)?;
        let secret = config.jwt_secret.as_bytes();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
            refresh_grace: config.refresh_grace,
            issuer: config.issuer.clone(),
            clock,
        })
    }

    /// Issue an access token and a refresh token carrying the same identity
    pub fn issue_token_pair(
        &self,
        user_id: u64,
        username: &str,
        role: &str,
        email: &str,
    ) -> std::result::Result<TokenPair, AuthError> {
        self.issue_for(Subject {
            user_id,
            username,
            role,
            email,
        })
    }

    pub(super) fn issue_for(&self, subject: Subject<'_>) -> std::result::Result<TokenPair, AuthError> {
        let now = self.clock.now();

        let access_token = self.mint(subject, TokenType::Access, now, self.access_ttl)?;
        let refresh_token = self.mint(subject, TokenType::Refresh, now, self.refresh_ttl)?;

        let expires_at = now
            .checked_add(self.access_ttl)
            .and_then(|exp| i64::try_from(exp).ok())
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
            .ok_or(AuthError::TokenIssueFailed)?;

        debug!(user_id = subject.user_id, "Issued token pair");
        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_at,
            expires_in: self.access_ttl,
        })
    }

    fn mint(
        &self,
        subject: Subject<'_>,
        token_type: TokenType,
        now: u64,
        ttl: u64,
    ) -> std::result::Result<String, AuthError> {
        let exp = now.checked_add(ttl).ok_or_else(|| {
            error!(user_id = subject.user_id, %token_type, now, ttl, "Token expiry overflows");
            AuthError::TokenIssueFailed
        })?;

        let claims = Claims {
            user_id: subject.user_id,
            username: subject.username.to_string(),
            role: subject.role.to_string(),
            email: subject.email.to_string(),
            iat: now,
            nbf: now,
            exp,
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
            token_type,
        };

        let header = Header::new(self.algorithm);
        encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(user_id = subject.user_id, %token_type, "Failed to sign token: {}", e);
            AuthError::TokenIssueFailed
        })
    }

    /// Verify signature, algorithm, issuer and the validity window
    pub fn validate(&self, token: &str) -> std::result::Result<Claims, AuthError> {
        let claims = self.decode_verified(token)?;
        self.check_window(&claims, self.clock.now())?;
        debug!(user_id = claims.user_id, jti = %claims.jti, "Token verified");
        Ok(claims)
    }

    /// [`validate`](Self::validate) restricted to one token type
    pub fn validate_as(
        &self,
        token: &str,
        expected: TokenType,
    ) -> std::result::Result<Claims, AuthError> {
        let claims = self.validate(token)?;
        if claims.token_type != expected {
            warn!(
                user_id = claims.user_id,
                expected = %expected,
                actual = %claims.token_type,
                "Rejected token of the wrong type"
            );
            return Err(TokenError::WrongTokenType.into());
        }
        Ok(claims)
    }

    /// Decode with signature, algorithm and issuer checks but no time checks
    pub(super) fn decode_verified(&self, token: &str) -> std::result::Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let kind = super::utils::classify(&e);
                warn!(error = %kind, "JWT verification failed");
                kind
            })
    }

    /// Reject tokens outside `[nbf, exp)`
    pub(super) fn check_window(
        &self,
        claims: &Claims,
        now: u64,
    ) -> std::result::Result<(), AuthError> {
        if now >= claims.exp {
            return Err(AuthError::ExpiredToken);
        }
        if now < claims.nbf {
            return Err(TokenError::NotYetValid.into());
        }
        Ok(())
    }
}
