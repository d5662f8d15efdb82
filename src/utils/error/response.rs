//! Serializable error bodies for transports that surface auth failures

use crate::auth::{AuthError, LookupFailure};
use serde::{Deserialize, Serialize};

/// Standard error response format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: i64,
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Build a response body for an auth failure.
    ///
    /// Store errors carry no details; only the stable code and the public
    /// message leave the process.
    pub fn from_auth_error(error: &AuthError) -> Self {
        let details = match error {
            AuthError::InvalidToken(kind) => Some(kind.to_string()),
            AuthError::InsufficientPermission { role, required } => {
                let wanted = required
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(format!("Role '{}' lacks {}", role, wanted))
            }
            AuthError::RoleNotAllowed { role, allowed } => Some(format!(
                "Required roles: {}, Current role: {}",
                allowed.join(", "),
                role
            )),
            AuthError::OwnershipDenied {
                resource_type,
                resource_id,
            } => Some(format!("{} {}", resource_type, resource_id)),
            AuthError::PermissionCheckFailed(LookupFailure::TimedOut { after_ms }) => {
                Some(format!("lookup timed out after {}ms", after_ms))
            }
            _ => None,
        };

        Self {
            success: false,
            error: ErrorDetail {
                code: error.code().to_string(),
                message: error.to_string(),
                details,
                timestamp: chrono::Utc::now().timestamp(),
                request_id: None,
            },
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.error.request_id = Some(request_id.into());
        self
    }
}

impl From<&AuthError> for ErrorResponse {
    fn from(error: &AuthError) -> Self {
        Self::from_auth_error(error)
    }
}
