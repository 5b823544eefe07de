use axum::http::{header, HeaderMap};

use crate::auth::tokens::{TokenError, TokenHandler};
use crate::error::MarqueeError;
use crate::models::user;

/// Pull `<token>` out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, MarqueeError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| MarqueeError::Unauthorized("Missing Authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| {
            MarqueeError::Unauthorized("Invalid Authorization header format".to_string())
        })
}

/// Resolve a presented bearer token to its user; `None` means unauthenticated.
pub async fn authenticate(
    tokens: &TokenHandler,
    token: &str,
) -> Result<Option<user::Model>, TokenError> {
    if token.is_empty() {
        return Ok(None);
    }
    tokens.get_user_from_token(token).await
}
