//! Refresh token exchange

use super::handler::Subject;
use super::types::{Claims, TokenPair, TokenService, TokenType};
use crate::auth::error::{AuthError, TokenError};
use tracing::{info, warn};

impl TokenService {
    /// Exchange a refresh token for a brand-new pair.
    ///
    /// The refresh token stays usable for `refresh_grace` seconds past its
    /// `exp`. The presented token is never extended; the new pair gets fresh
    /// `iat`, `nbf`, `exp` and `jti` values.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.verify_refresh(refresh_token)?;

        let pair = self.issue_for(Subject {
            user_id: claims.user_id,
            username: &claims.username,
            role: &claims.role,
            email: &claims.email,
        })?;

        info!(user_id = claims.user_id, previous = %claims.jti, "Refreshed token pair");
        Ok(pair)
    }

    /// Check that `refresh_token` may be exchanged now, returning its claims
    pub fn verify_refresh(&self, refresh_token: &str) -> Result<Claims, AuthError> {
        let claims = self.decode_verified(refresh_token)?;

        if claims.token_type != TokenType::Refresh {
            warn!(user_id = claims.user_id, "Access token presented for refresh");
            return Err(TokenError::WrongTokenType.into());
        }

        let now = self.clock.now();
        if now < claims.nbf {
            return Err(TokenError::NotYetValid.into());
        }
        if now > claims.exp.saturating_add(self.refresh_grace) {
            warn!(
                user_id = claims.user_id,
                jti = %claims.jti,
                "Refresh token is past its grace window"
            );
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }

    /// Refresh token lifetime plus grace, in seconds
    pub fn refresh_horizon(&self) -> u64 {
        self.refresh_ttl.saturating_add(self.refresh_grace)
    }
}
