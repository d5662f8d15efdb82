//! Authentication and authorization
//!
//! Token issuance and validation, bearer header parsing, the permission
//! catalog and role table, and the authorization guard that combines them.

pub mod bearer;
pub mod credentials;
pub mod error;
pub mod jwt;
pub mod principal;
pub mod rbac;
pub mod service;
pub mod system;

pub use bearer::{BEARER_SCHEME, extract_bearer};
pub use credentials::{Argon2Verifier, CredentialVerifier};
pub use error::{AuthError, AuthErrorKind, LookupFailure, MalformedHeader, RoleIssue, TokenError};
pub use jwt::{Claims, TokenPair, TokenService, TokenStatus, TokenType};
pub use principal::Principal;
pub use service::{
    AuthResponse, AuthService, InMemoryUserDirectory, LoginRequest, UserDirectory, UserInfo,
    UserRecord,
};
pub use system::AuthSystem;
