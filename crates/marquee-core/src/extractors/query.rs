use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::error::MarqueeError;

/// Query-string extractor whose rejections use the standard error envelope.
///
/// ```rust,ignore
/// async fn create_review(Query(target): Query<ReviewTarget>) -> impl IntoResponse {
///     // target.movie_id
/// }
/// ```
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = MarqueeError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or("");
        let value: T = serde_urlencoded::from_str(query)
            .map_err(|e| MarqueeError::BadRequest(format!("Invalid query string: {}", e)))?;
        Ok(Query(value))
    }
}
