//! Authentication and authorization error taxonomy
//!
//! Every expected failure of the token service and the guard is a value of
//! [`AuthError`]. Callers map [`AuthError::kind`] to their transport; the
//! HTTP status choice lives outside this crate.

use serde::Serialize;
use thiserror::Error;

use super::rbac::{Permission, Resource};

/// Why a bearer header could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedHeader {
    /// Scheme is not `Bearer`, or there is no space-separated credential
    WrongScheme,
    /// `Bearer` with nothing after it
    EmptyToken,
    /// Header bytes are not visible ASCII
    NotAscii,
}

impl std::fmt::Display for MalformedHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongScheme => f.write_str("expected 'Bearer <token>'"),
            Self::EmptyToken => f.write_str("token is required"),
            Self::NotAscii => f.write_str("header is not valid ASCII"),
        }
    }
}

/// Token-level failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("signature verification failed")]
    InvalidSignature,
    #[error("unexpected signing algorithm")]
    WrongAlgorithm,
    #[error("token issuer is not trusted")]
    InvalidIssuer,
    #[error("token is not valid yet")]
    NotYetValid,
    #[error("token type is not accepted here")]
    WrongTokenType,
}

/// Why a principal's role could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleIssue {
    Missing,
    InvalidFormat,
}

/// Why a dynamic or ownership lookup produced no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    TimedOut { after_ms: u64 },
    Store(String),
}

/// Coarse error kind, stable across message wording changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthErrorKind {
    MissingAuthorization,
    MalformedAuthorization,
    InvalidToken,
    ExpiredToken,
    RoleUnresolved,
    InsufficientPermission,
    OwnershipDenied,
    UnsupportedResourceType,
    PermissionCheckFailed,
    InvalidCredentials,
    AccountInactive,
    CredentialCheckFailed,
    TokenIssueFailed,
}

/// Request-time authentication/authorization failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is required")]
    MissingAuthorization,

    #[error("Invalid authorization header: {0}")]
    MalformedAuthorization(MalformedHeader),

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("Token has expired")]
    ExpiredToken,

    #[error("{}", describe_role_issue(*.0))]
    RoleUnresolved(RoleIssue),

    #[error("Insufficient permissions. {}", describe_required(.required))]
    InsufficientPermission {
        role: String,
        required: Vec<Permission>,
    },

    #[error("Insufficient permissions. Required roles: {}", .allowed.join(", "))]
    RoleNotAllowed { role: String, allowed: Vec<String> },

    #[error("Access denied. You can only access your own resources")]
    OwnershipDenied {
        resource_type: Resource,
        resource_id: u64,
    },

    #[error("Unsupported resource type: {0}")]
    UnsupportedResourceType(String),

    #[error("Failed to verify permissions")]
    PermissionCheckFailed(LookupFailure),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is inactive")]
    AccountInactive,

    #[error("Failed to verify credentials")]
    CredentialCheckFailed,

    #[error("Failed to generate tokens")]
    TokenIssueFailed,
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            Self::MissingAuthorization => AuthErrorKind::MissingAuthorization,
            Self::MalformedAuthorization(_) => AuthErrorKind::MalformedAuthorization,
            Self::InvalidToken(_) => AuthErrorKind::InvalidToken,
            Self::ExpiredToken => AuthErrorKind::ExpiredToken,
            Self::RoleUnresolved(_) => AuthErrorKind::RoleUnresolved,
            Self::InsufficientPermission { .. } | Self::RoleNotAllowed { .. } => {
                AuthErrorKind::InsufficientPermission
            }
            Self::OwnershipDenied { .. } => AuthErrorKind::OwnershipDenied,
            Self::UnsupportedResourceType(_) => AuthErrorKind::UnsupportedResourceType,
            Self::PermissionCheckFailed(_) => AuthErrorKind::PermissionCheckFailed,
            Self::InvalidCredentials => AuthErrorKind::InvalidCredentials,
            Self::AccountInactive => AuthErrorKind::AccountInactive,
            Self::CredentialCheckFailed => AuthErrorKind::CredentialCheckFailed,
            Self::TokenIssueFailed => AuthErrorKind::TokenIssueFailed,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingAuthorization => "missing_authorization_header",
            Self::MalformedAuthorization(MalformedHeader::EmptyToken) => "missing_token",
            Self::MalformedAuthorization(_) => "invalid_authorization_format",
            Self::InvalidToken(_) => "invalid_token",
            Self::ExpiredToken => "token_expired",
            Self::RoleUnresolved(RoleIssue::Missing) => "role_not_found",
            Self::RoleUnresolved(RoleIssue::InvalidFormat) => "invalid_role_format",
            Self::InsufficientPermission { .. } | Self::RoleNotAllowed { .. } => {
                "insufficient_permissions"
            }
            Self::OwnershipDenied { .. } => "resource_access_denied",
            Self::UnsupportedResourceType(_) => "unsupported_resource_type",
            Self::PermissionCheckFailed(_) => "permission_check_failed",
            Self::InvalidCredentials => "invalid_credentials",
            Self::AccountInactive => "account_inactive",
            Self::CredentialCheckFailed => "credential_check_failed",
            Self::TokenIssueFailed => "token_generation_failed",
        }
    }

    /// True for failures that mean "who are you?" rather than "you may not".
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            Self::MissingAuthorization
                | Self::MalformedAuthorization(_)
                | Self::InvalidToken(_)
                | Self::ExpiredToken
                | Self::InvalidCredentials
                | Self::AccountInactive
        )
    }

    /// True when the failure came from a collaborator, not from a policy decision.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::PermissionCheckFailed(_) | Self::CredentialCheckFailed | Self::TokenIssueFailed
        )
    }
}

fn describe_role_issue(issue: RoleIssue) -> &'static str {
    match issue {
        RoleIssue::Missing => "User role is not available",
        RoleIssue::InvalidFormat => "Invalid user role format",
    }
}

fn describe_required(required: &[Permission]) -> String {
    match required {
        [] => "No permission was specified".to_string(),
        [single] => format!("Required: {}", single),
        many => format!(
            "Requires at least one of: {}",
            many.iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}
