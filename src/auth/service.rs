//! Login, refresh and logout on top of the token service

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::credentials::CredentialVerifier;
use super::error::AuthError;
use super::jwt::{TokenPair, TokenService};
use super::principal::Principal;
use crate::utils::error::Result;

/// A user account as stored by the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: String,
    /// Encoded password hash; never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Account lookup owned by the surrounding platform
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    async fn find_by_id(&self, user_id: u64) -> Result<Option<UserRecord>>;

    /// Called after a successful login
    async fn record_login(&self, _user_id: u64, _at: DateTime<Utc>) -> Result<()> {
        Ok(())
    }
}

/// Directory held in memory, keyed by id
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: DashMap<u64, UserRecord>,
    last_login: DashMap<u64, DateTime<Utc>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: UserRecord) {
        self.users.insert(user.id, user);
    }

    pub fn set_active(&self, user_id: u64, active: bool) -> bool {
        match self.users.get_mut(&user_id) {
            Some(mut user) => {
                user.is_active = active;
                true
            }
            None => false,
        }
    }

    pub fn last_login(&self, user_id: u64) -> Option<DateTime<Utc>> {
        self.last_login.get(&user_id).map(|at| *at)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.email.eq_ignore_ascii_case(email))
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, user_id: u64) -> Result<Option<UserRecord>> {
        Ok(self.users.get(&user_id).map(|user| user.clone()))
    }

    async fn record_login(&self, user_id: u64, at: DateTime<Utc>) -> Result<()> {
        self.last_login.insert(user_id, at);
        Ok(())
    }
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for UserInfo {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Tokens plus the account they were issued for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user: UserInfo,
}

/// Session lifecycle for end users
#[derive(Clone)]
pub struct AuthService {
    tokens: Arc<TokenService>,
    users: Arc<dyn UserDirectory>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl AuthService {
    pub fn new(
        tokens: Arc<TokenService>,
        users: Arc<dyn UserDirectory>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            tokens,
            users,
            verifier,
        }
    }

    /// Exchange an email and password for a token pair.
    ///
    /// An unknown email and a wrong password are indistinguishable to the
    /// caller. The active flag is checked only after the password matches.
    pub async fn login(&self, request: &LoginRequest) -> std::result::Result<AuthResponse, AuthError> {
        let user = self
            .users
            .find_by_email(&request.email)
            .await
            .map_err(|e| {
                error!("User lookup failed during login: {}", e);
                AuthError::CredentialCheckFailed
            })?
            .ok_or_else(|| {
                warn!("Login attempt for unknown email");
                AuthError::InvalidCredentials
            })?;

        let matches = self
            .verifier
            .verify(&request.password, &user.password_hash)
            .map_err(|e| {
                error!(user_id = user.id, "Password check failed: {}", e);
                AuthError::CredentialCheckFailed
            })?;
        if !matches {
            warn!(user_id = user.id, "Login attempt with invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            warn!(user_id = user.id, "Login attempt for inactive user");
            return Err(AuthError::AccountInactive);
        }

        let tokens = self.issue_for(&user)?;

        if let Err(e) = self.users.record_login(user.id, Utc::now()).await {
            warn!(user_id = user.id, "Failed to record login time: {}", e);
        }

        info!(user_id = user.id, role = %user.role, "User logged in");
        Ok(AuthResponse {
            tokens,
            user: UserInfo::from(&user),
        })
    }

    /// Exchange a refresh token for a new pair.
    ///
    /// The new pair carries the account's current username, email and role,
    /// so role changes take effect on the next refresh.
    pub async fn refresh(&self, refresh_token: &str) -> std::result::Result<AuthResponse, AuthError> {
        let claims = self.tokens.verify_refresh(refresh_token)?;

        let user = self
            .users
            .find_by_id(claims.user_id)
            .await
            .map_err(|e| {
                error!(user_id = claims.user_id, "User lookup failed during refresh: {}", e);
                AuthError::CredentialCheckFailed
            })?
            .ok_or_else(|| {
                warn!(user_id = claims.user_id, "Refresh for a user that no longer exists");
                AuthError::InvalidCredentials
            })?;

        if !user.is_active {
            warn!(user_id = user.id, "Refresh for inactive user");
            return Err(AuthError::AccountInactive);
        }

        let tokens = self.issue_for(&user)?;
        info!(user_id = user.id, previous = %claims.jti, "Token refreshed");
        Ok(AuthResponse {
            tokens,
            user: UserInfo::from(&user),
        })
    }

    /// Tokens are stateless; logout only records the event.
    pub async fn logout(&self, principal: &Principal) {
        info!(user_id = principal.user_id, "User logged out");
    }

    fn issue_for(&self, user: &UserRecord) -> std::result::Result<TokenPair, AuthError> {
        self.tokens
            .issue_token_pair(user.id, &user.username, &user.role, &user.email)
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
