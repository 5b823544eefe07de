use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use marquee_core::extractors::{Json, Pagination};
use marquee_core::{ApiResponse, AppState, MarqueeError};

use crate::models::actor::{self, ActorSummary, Entity as Actor};

const IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

// ── Request / Response types ──

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateActorRequest {
    pub name: String,
    pub age: i32,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActorDetail {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub description: String,
    pub image: String,
}

impl From<actor::Model> for ActorDetail {
    fn from(actor: actor::Model) -> Self {
        ActorDetail {
            id: actor.id,
            name: actor.name,
            age: actor.age,
            description: actor.description,
            image: actor.image,
        }
    }
}

// ── Routes ──

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/actors", get(list_actors).post(create_actor))
        .route("/api/actors/{id}", get(get_actor))
}

fn has_image_extension(image: &str) -> bool {
    let lower = image.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

// ── Handlers ──

/// List actors.
#[utoipa::path(
    get,
    path = "/api/actors",
    params(Pagination),
    responses(
        (status = 200, description = "Actors", body = ApiResponse<Vec<ActorSummary>>)
    ),
    tag = "actors"
)]
pub async fn list_actors(
    State(state): State<AppState>,
    pagination: Pagination,
) -> Result<ApiResponse<Vec<ActorSummary>>, MarqueeError> {
    let actors = Actor::find()
        .order_by_asc(actor::Column::Id)
        .offset(pagination.offset)
        .limit(pagination.limit)
        .all(&state.db)
        .await?;

    Ok(ApiResponse::success(
        actors.into_iter().map(ActorSummary::from).collect(),
    ))
}

/// Create an actor.
#[utoipa::path(
    post,
    path = "/api/actors",
    request_body = CreateActorRequest,
    responses(
        (status = 201, description = "Actor created", body = ApiResponse<ActorSummary>),
        (status = 400, description = "Empty field, negative age or unsupported image format")
    ),
    tag = "actors"
)]
pub async fn create_actor(
    State(state): State<AppState>,
    Json(payload): Json<CreateActorRequest>,
) -> Result<(StatusCode, ApiResponse<ActorSummary>), MarqueeError> {
    if payload.name.trim().is_empty()
        || payload.description.trim().is_empty()
        || payload.image.trim().is_empty()
        || payload.age < 0
    {
        return Err(MarqueeError::BadRequest("Invalid input".to_string()));
    }
    if !has_image_extension(&payload.image) {
        return Err(MarqueeError::BadRequest("Invalid image format".to_string()));
    }

    let created = actor::ActiveModel {
        name: Set(payload.name),
        age: Set(payload.age),
        description: Set(payload.description),
        image: Set(payload.image),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(actor_id = created.id, "created actor");
    Ok(ApiResponse::created(ActorSummary::from(created)))
}

/// Get one actor's details.
#[utoipa::path(
    get,
    path = "/api/actors/{id}",
    params(
        ("id" = i32, Path, description = "Actor ID")
    ),
    responses(
        (status = 200, description = "Actor found", body = ApiResponse<ActorDetail>),
        (status = 404, description = "Actor not found")
    ),
    tag = "actors"
)]
pub async fn get_actor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<ActorDetail>, MarqueeError> {
    let actor = Actor::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| MarqueeError::NotFound(format!("Actor with id {} not found", id)))?;

    Ok(ApiResponse::success(ActorDetail::from(actor)))
}
