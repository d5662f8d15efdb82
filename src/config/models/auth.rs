//! Authentication configuration

use jsonwebtoken::Algorithm;
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Longest accepted token lifetime, refresh grace included (100 years)
pub const MAX_TOKEN_LIFETIME: u64 = 100 * 365 * 24 * 3600;

const PLACEHOLDER_SECRETS: &[&str] = &[
    "your-secret-key",
    "change-me",
    "your-super-secret-jwt-key-change-this-in-production",
];

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing secret
    #[serde(default = "generate_secure_jwt_secret")]
    pub jwt_secret: String,
    /// Signing algorithm name; HS256, HS384 or HS512
    #[serde(default = "default_jwt_algorithm")]
    pub jwt_algorithm: String,
    /// Issuer tag written into and required from every token
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Access token lifetime in seconds
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl: u64,
    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_token_ttl")]
    pub refresh_token_ttl: u64,
    /// Extra seconds a refresh token stays refreshable after `exp`
    #[serde(default = "default_refresh_grace")]
    pub refresh_grace: u64,
    /// RBAC configuration
    #[serde(default)]
    pub rbac: RbacConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: generate_secure_jwt_secret(),
            jwt_algorithm: default_jwt_algorithm(),
            issuer: default_issuer(),
            access_token_ttl: default_access_token_ttl(),
            refresh_token_ttl: default_refresh_token_ttl(),
            refresh_grace: default_refresh_grace(),
            rbac: RbacConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Parsed signing algorithm, restricted to the HMAC family.
    pub fn algorithm(&self) -> Result<Algorithm, String> {
        let algorithm = Algorithm::from_str(&self.jwt_algorithm)
            .map_err(|_| format!("Unknown JWT algorithm '{}'", self.jwt_algorithm))?;
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
            other => Err(format!(
                "JWT algorithm {:?} is not supported; use HS256, HS384 or HS512",
                other
            )),
        }
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long for security".to_string());
        }

        if PLACEHOLDER_SECRETS.contains(&self.jwt_secret.as_str()) {
            return Err(
                "JWT secret must not use default values. Please generate a secure random secret."
                    .to_string(),
            );
        }

        self.algorithm()?;

        if self.issuer.trim().is_empty() {
            return Err("JWT issuer cannot be empty".to_string());
        }

        if self.access_token_ttl < 60 {
            return Err("Access token lifetime should be at least 60 seconds".to_string());
        }

        if self.refresh_token_ttl <= self.access_token_ttl {
            return Err("Refresh token lifetime must exceed the access token lifetime".to_string());
        }

        let refresh_horizon = self
            .refresh_token_ttl
            .checked_add(self.refresh_grace)
            .filter(|horizon| *horizon <= MAX_TOKEN_LIFETIME);
        if refresh_horizon.is_none() {
            return Err(format!(
                "Refresh token lifetime plus grace must not exceed {} seconds",
                MAX_TOKEN_LIFETIME
            ));
        }

        self.rbac.validate()
    }
}

/// RBAC configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RbacConfig {
    /// Role that bypasses ownership checks
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
    /// Upper bound for each permission-store or ownership call
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            admin_role: default_admin_role(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
        }
    }
}

impl RbacConfig {
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.admin_role.trim().is_empty() {
            return Err("Admin role name cannot be empty".to_string());
        }
        if self.lookup_timeout_ms == 0 {
            return Err("Permission lookup timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

fn default_issuer() -> String {
    "ton-platform".to_string()
}

fn default_access_token_ttl() -> u64 {
    15 * 60
}

fn default_refresh_token_ttl() -> u64 {
    7 * 24 * 3600
}

fn default_refresh_grace() -> u64 {
    7 * 24 * 3600
}

fn default_admin_role() -> String {
    "Administrator".to_string()
}

fn default_lookup_timeout_ms() -> u64 {
    2000
}

/// Generate a secure random JWT secret
fn generate_secure_jwt_secret() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
