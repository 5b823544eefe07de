use axum::{extract::State, http::StatusCode, routing::post, Router};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use marquee_core::extractors::Json;
use marquee_core::{ApiResponse, AppState, MarqueeError};

use crate::models::movie::Entity as Movie;
use crate::models::rating::{self, Entity as Rating};
use crate::models::rating_star::Entity as RatingStar;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRatingRequest {
    pub ip: String,
    pub star_id: i32,
    pub movie_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RatingResponse {
    pub id: i32,
    pub ip: String,
    pub star_id: i32,
    pub movie_id: i32,
}

impl From<rating::Model> for RatingResponse {
    fn from(rating: rating::Model) -> Self {
        RatingResponse {
            id: rating.id,
            ip: rating.ip,
            star_id: rating.star_id,
            movie_id: rating.movie_id,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/ratings", post(create_rating))
}

/// Rate a movie. Rating the same movie again from the same IP replaces the star.
#[utoipa::path(
    post,
    path = "/api/ratings",
    request_body = CreateRatingRequest,
    responses(
        (status = 201, description = "Rating stored", body = ApiResponse<RatingResponse>),
        (status = 400, description = "Missing IP"),
        (status = 404, description = "Star or movie not found")
    ),
    tag = "ratings"
)]
pub async fn create_rating(
    State(state): State<AppState>,
    Json(payload): Json<CreateRatingRequest>,
) -> Result<(StatusCode, ApiResponse<RatingResponse>), MarqueeError> {
    let ip = payload.ip.trim().to_string();
    if ip.is_empty() {
        return Err(MarqueeError::BadRequest("Missing ip field!".to_string()));
    }

    RatingStar::find_by_id(payload.star_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| MarqueeError::NotFound("Rating star not found".to_string()))?;
    Movie::find_by_id(payload.movie_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| MarqueeError::NotFound("Movie not found".to_string()))?;

    let row = rating::ActiveModel {
        ip: Set(ip.clone()),
        star_id: Set(payload.star_id),
        movie_id: Set(payload.movie_id),
        ..Default::default()
    };

    Rating::insert(row)
        .on_conflict(
            OnConflict::columns([rating::Column::Ip, rating::Column::MovieId])
                .update_column(rating::Column::StarId)
                .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await?;

    let stored = Rating::find()
        .filter(rating::Column::Ip.eq(ip.as_str()))
        .filter(rating::Column::MovieId.eq(payload.movie_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| MarqueeError::Internal("Rating vanished after write".to_string()))?;

    tracing::info!(movie_id = stored.movie_id, star_id = stored.star_id, "stored rating");
    Ok(ApiResponse::created(RatingResponse::from(stored)))
}
