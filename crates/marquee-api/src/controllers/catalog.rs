use axum::{extract::State, routing::get, Router};
use sea_orm::{EntityTrait, QueryOrder};

use marquee_core::{ApiResponse, AppState, MarqueeError};

use crate::models::{category, genre};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories))
        .route("/api/genres", get(list_genres))
}

/// List categories.
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories", body = ApiResponse<Vec<category::Model>>)
    ),
    tag = "catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<category::Model>>, MarqueeError> {
    let categories = category::Entity::find()
        .order_by_asc(category::Column::Name)
        .all(&state.db)
        .await?;
    Ok(ApiResponse::success(categories))
}

/// List genres.
#[utoipa::path(
    get,
    path = "/api/genres",
    responses(
        (status = 200, description = "Genres", body = ApiResponse<Vec<genre::Model>>)
    ),
    tag = "catalog"
)]
pub async fn list_genres(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<genre::Model>>, MarqueeError> {
    let genres = genre::Entity::find()
        .order_by_asc(genre::Column::Name)
        .all(&state.db)
        .await?;
    Ok(ApiResponse::success(genres))
}
