//! Bearer token gate for protected endpoints

use crate::auth::TokenManager;
use crate::error::{Result, StockError};
use crate::storage::{DbSession, User};

/// Extracts the token from an `Authorization: Bearer <token>` header value.
/// The scheme is matched case-insensitively.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    let (scheme, token) = auth_header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Resolves the caller of a protected request to a stored user.
///
/// Missing header, wrong scheme, bad or expired token, absent subject and a
/// subject that no longer exists all end in the same `Unauthorized`.
pub async fn authenticate(
    auth_header: Option<&str>,
    tokens: &TokenManager,
    session: &mut DbSession,
) -> Result<User> {
    let token = match auth_header.and_then(extract_bearer_token) {
        Some(token) => token,
        None => {
            log::debug!("Request carries no bearer token");
            return Err(StockError::Unauthorized);
        }
    };

    let claims = tokens.validate_token(token)?;
    let username = claims.subject().ok_or(StockError::Unauthorized)?;

    match session.find_user_by_username(username).await? {
        Some(user) => Ok(user),
        None => {
            log::warn!("Valid token for unknown user rejected");
            Err(StockError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("BEARER  abc "), Some("abc"));
    }

    #[test]
    fn test_extract_bearer_token_rejects_other_forms() {
        assert_eq!(extract_bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_bearer_token("Bearer"), None);
        assert_eq!(extract_bearer_token("Bearer   "), None);
        assert_eq!(extract_bearer_token("abc.def.ghi"), None);
        assert_eq!(extract_bearer_token(""), None);
    }
}
