use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use marquee_core::extractors::{Json, Query};
use marquee_core::{ApiResponse, AppState, MarqueeError};

use crate::models::movie::Entity as Movie;
use crate::models::review::{self, Entity as Review};

// ── Request / Response types ──

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewTarget {
    /// Movie the review is written for
    pub movie_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
    /// Review being replied to
    pub parent: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewCreated {
    pub name: String,
    pub text: String,
    pub parent: Option<i32>,
    /// Title of the reviewed movie
    pub movie: String,
}

/// A top-level review with its direct replies.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: i32,
    pub name: String,
    pub text: String,
    pub children: Vec<ReviewChild>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewChild {
    pub id: i32,
    pub name: String,
    pub text: String,
}

impl From<&review::Model> for ReviewChild {
    fn from(review: &review::Model) -> Self {
        ReviewChild {
            id: review.id,
            name: review.name.clone(),
            text: review.text.clone(),
        }
    }
}

// ── Routes ──

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/reviews", post(create_review))
        .route("/api/movies/{id}/reviews", get(list_movie_reviews))
}

/// Load a movie's reviews as top-level entries, each carrying its replies.
pub(crate) async fn review_tree<C: ConnectionTrait>(
    db: &C,
    movie_id: i32,
) -> Result<Vec<ReviewResponse>, MarqueeError> {
    let reviews = Review::find()
        .filter(review::Column::MovieId.eq(movie_id))
        .order_by_asc(review::Column::Id)
        .all(db)
        .await?;

    let tree = reviews
        .iter()
        .filter(|r| r.parent_id.is_none())
        .map(|top| ReviewResponse {
            id: top.id,
            name: top.name.clone(),
            text: top.text.clone(),
            children: reviews
                .iter()
                .filter(|r| r.parent_id == Some(top.id))
                .map(ReviewChild::from)
                .collect(),
        })
        .collect();

    Ok(tree)
}

// ── Handlers ──

/// Post a review, optionally as a reply to another review of the same movie.
#[utoipa::path(
    post,
    path = "/api/reviews",
    params(ReviewTarget),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<ReviewCreated>),
        (status = 400, description = "Empty field or parent from another movie"),
        (status = 404, description = "Movie not found")
    ),
    tag = "reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    Query(target): Query<ReviewTarget>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<(StatusCode, ApiResponse<ReviewCreated>), MarqueeError> {
    if payload.email.trim().is_empty()
        || payload.name.trim().is_empty()
        || payload.text.trim().is_empty()
    {
        return Err(MarqueeError::BadRequest(
            "Email, name, and text must not be empty.".to_string(),
        ));
    }

    let movie = Movie::find_by_id(target.movie_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| MarqueeError::NotFound("Movie not found".to_string()))?;

    if let Some(parent_id) = payload.parent {
        let parent = Review::find_by_id(parent_id).one(&state.db).await?;
        if !matches!(parent, Some(ref p) if p.movie_id == movie.id) {
            return Err(MarqueeError::BadRequest(
                "Parent review does not belong to this movie".to_string(),
            ));
        }
    }

    let created = review::ActiveModel {
        email: Set(payload.email),
        name: Set(payload.name),
        text: Set(payload.text),
        parent_id: Set(payload.parent),
        movie_id: Set(movie.id),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(review_id = created.id, movie_id = movie.id, "created review");
    Ok(ApiResponse::created(ReviewCreated {
        name: created.name,
        text: created.text,
        parent: created.parent_id,
        movie: movie.title,
    }))
}

/// List a movie's reviews.
#[utoipa::path(
    get,
    path = "/api/movies/{id}/reviews",
    params(
        ("id" = i32, Path, description = "Movie ID")
    ),
    responses(
        (status = 200, description = "Reviews with replies", body = ApiResponse<Vec<ReviewResponse>>),
        (status = 404, description = "Movie not found")
    ),
    tag = "reviews"
)]
pub async fn list_movie_reviews(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<Vec<ReviewResponse>>, MarqueeError> {
    Movie::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| MarqueeError::NotFound("Movie not found".to_string()))?;

    Ok(ApiResponse::success(review_tree(&state.db, id).await?))
}
