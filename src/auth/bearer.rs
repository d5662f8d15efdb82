//! `Authorization: Bearer <token>` parsing

use super::error::{AuthError, MalformedHeader};

pub const BEARER_SCHEME: &str = "Bearer";

/// Extract the token from an `Authorization` header value.
///
/// An absent or empty header is [`AuthError::MissingAuthorization`]; a header
/// that is not `Bearer <token>` and a `Bearer` header with no token are
/// reported separately.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::MissingAuthorization),
    };

    if !header.is_ascii() {
        return Err(AuthError::MalformedAuthorization(MalformedHeader::NotAscii));
    }

    let (scheme, token) = header
        .split_once(' ')
        .ok_or(AuthError::MalformedAuthorization(MalformedHeader::WrongScheme))?;

    if scheme != BEARER_SCHEME {
        return Err(AuthError::MalformedAuthorization(MalformedHeader::WrongScheme));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MalformedAuthorization(MalformedHeader::EmptyToken));
    }

    Ok(token)
}
