use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth;
use crate::controllers::AppState;
use crate::error::MarqueeError;
use crate::models::user;

/// Extractor that resolves the bearer token and provides the authenticated user.
///
/// Usage in handlers:
/// ```rust,ignore
/// async fn my_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     // user is the account that owns the presented access token
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = MarqueeError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = auth::bearer_token(&parts.headers)?;

        match auth::authenticate(&state.tokens, token).await? {
            Some(user) => Ok(AuthUser(user)),
            None => Err(MarqueeError::Unauthorized(
                "Invalid or expired access token".to_string(),
            )),
        }
    }
}
