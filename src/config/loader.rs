//! Configuration loading from environment variables

use super::Config;
use crate::utils::error::{PlatformError, Result};
use std::str::FromStr;
use tracing::debug;

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, starting from defaults.
    ///
    /// Durations follow the deployment conventions: access lifetime in minutes,
    /// refresh lifetime and grace in hours.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("Loading configuration from environment variables");

        let mut config = Self::default();
        let auth = &mut config.auth;

        if let Some(secret) = lookup("JWT_SECRET") {
            auth.jwt_secret = secret;
        }
        if let Some(algorithm) = lookup("JWT_ALGORITHM") {
            auth.jwt_algorithm = algorithm;
        }
        if let Some(issuer) = lookup("JWT_ISSUER") {
            auth.issuer = issuer;
        }
        if let Some(minutes) = parse_var::<u64, _>(&lookup, "JWT_ACCESS_EXPIRE_TIME")? {
            auth.access_token_ttl = minutes.saturating_mul(60);
        }
        if let Some(hours) = parse_var::<u64, _>(&lookup, "JWT_REFRESH_EXPIRE_TIME")? {
            auth.refresh_token_ttl = hours.saturating_mul(3600);
        }
        if let Some(hours) = parse_var::<u64, _>(&lookup, "JWT_REFRESH_GRACE")? {
            auth.refresh_grace = hours.saturating_mul(3600);
        }
        if let Some(role) = lookup("RBAC_ADMIN_ROLE") {
            auth.rbac.admin_role = role;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "RBAC_LOOKUP_TIMEOUT_MS")? {
            auth.rbac.lookup_timeout_ms = ms;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            config.logging.json = match format.to_ascii_lowercase().as_str() {
                "json" => true,
                "text" | "pretty" => false,
                other => {
                    return Err(PlatformError::config(format!(
                        "Invalid LOG_FORMAT '{}': expected json or text",
                        other
                    )));
                }
            };
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| PlatformError::config(format!("Invalid {}: {}", key, e))),
    }
}
