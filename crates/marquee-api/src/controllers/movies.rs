use std::collections::{HashMap, HashSet};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use marquee_core::extractors::{AuthUser, ClientIp, Json, Pagination};
use marquee_core::{ApiResponse, AppState, MarqueeError};

use crate::controllers::reviews::{review_tree, ReviewResponse};
use crate::models::actor::{self, ActorSummary};
use crate::models::movie::{self, Entity as Movie};
use crate::models::{category, genre, movie_actor, movie_director, movie_genre, rating, rating_star};

// ── Request / Response types ──

/// One row of the public movie list.
#[derive(Debug, Serialize, ToSchema)]
pub struct MovieListItem {
    pub id: i32,
    pub title: String,
    pub tagline: String,
    /// Category name, empty when the movie has none
    pub category: String,
    /// Whether the caller's IP has rated this movie
    pub rating_user: bool,
    /// Mean star value rounded to the nearest whole star, 0 when unrated
    pub middle_star: i32,
    pub poster: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMovieRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub poster: String,
    pub year: i32,
    #[serde(default)]
    pub country: String,
    /// Actor IDs credited as directors
    #[serde(default)]
    pub directors: Vec<i32>,
    #[serde(default)]
    pub actors: Vec<i32>,
    #[serde(default)]
    pub genres: Vec<i32>,
    pub world_premiere: NaiveDate,
    #[serde(default)]
    pub budget: i64,
    #[serde(default)]
    pub fees_in_usa: i64,
    pub fees_in_world: Option<i64>,
    /// Category ID
    pub category: Option<i32>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub draft: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MovieDetail {
    pub id: i32,
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub poster: String,
    pub year: i32,
    pub country: String,
    pub directors: Vec<ActorSummary>,
    pub actors: Vec<ActorSummary>,
    /// Genre names
    pub genres: Vec<String>,
    pub world_premiere: NaiveDate,
    pub budget: i64,
    pub fees_in_usa: i64,
    pub fees_in_world: Option<i64>,
    /// Category name
    pub category: Option<String>,
    pub url: String,
    pub draft: bool,
    pub reviews: Vec<ReviewResponse>,
}

// ── Routes ──

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/movies", get(list_movies).post(create_movie))
        .route("/api/movies/{id}", get(get_movie))
}

// ── Helpers ──

fn middle_star(values: &[i32]) -> i32 {
    if values.is_empty() {
        return 0;
    }
    let sum: i32 = values.iter().sum();
    (f64::from(sum) / values.len() as f64).round() as i32
}

fn unique_ids(ids: &[i32]) -> Vec<i32> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

async fn ensure_actors_exist(
    db: &DatabaseConnection,
    ids: &[i32],
    role: &str,
) -> Result<(), MarqueeError> {
    if ids.is_empty() {
        return Ok(());
    }
    let found = actor::Entity::find()
        .filter(actor::Column::Id.is_in(ids.iter().copied()))
        .count(db)
        .await?;
    if found != ids.len() as u64 {
        return Err(MarqueeError::NotFound(format!("Unknown {} id", role)));
    }
    Ok(())
}

async fn ensure_genres_exist(db: &DatabaseConnection, ids: &[i32]) -> Result<(), MarqueeError> {
    if ids.is_empty() {
        return Ok(());
    }
    let found = genre::Entity::find()
        .filter(genre::Column::Id.is_in(ids.iter().copied()))
        .count(db)
        .await?;
    if found != ids.len() as u64 {
        return Err(MarqueeError::NotFound("Unknown genre id".to_string()));
    }
    Ok(())
}

async fn load_people(
    db: &DatabaseConnection,
    ids: Vec<i32>,
) -> Result<Vec<ActorSummary>, MarqueeError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let people = actor::Entity::find()
        .filter(actor::Column::Id.is_in(ids))
        .order_by_asc(actor::Column::Id)
        .all(db)
        .await?;
    Ok(people.into_iter().map(ActorSummary::from).collect())
}

async fn load_detail(
    db: &DatabaseConnection,
    movie: movie::Model,
) -> Result<MovieDetail, MarqueeError> {
    let director_ids = movie_director::Entity::find()
        .filter(movie_director::Column::MovieId.eq(movie.id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.director_id)
        .collect();
    let actor_ids = movie_actor::Entity::find()
        .filter(movie_actor::Column::MovieId.eq(movie.id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.actor_id)
        .collect();
    let genre_ids: Vec<i32> = movie_genre::Entity::find()
        .filter(movie_genre::Column::MovieId.eq(movie.id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.genre_id)
        .collect();

    let genres = if genre_ids.is_empty() {
        Vec::new()
    } else {
        genre::Entity::find()
            .filter(genre::Column::Id.is_in(genre_ids))
            .order_by_asc(genre::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(|g| g.name)
            .collect()
    };

    let category = match movie.category_id {
        Some(category_id) => category::Entity::find_by_id(category_id)
            .one(db)
            .await?
            .map(|c| c.name),
        None => None,
    };

    Ok(MovieDetail {
        directors: load_people(db, director_ids).await?,
        actors: load_people(db, actor_ids).await?,
        genres,
        category,
        reviews: review_tree(db, movie.id).await?,
        id: movie.id,
        title: movie.title,
        tagline: movie.tagline,
        description: movie.description,
        poster: movie.poster,
        year: movie.year,
        country: movie.country,
        world_premiere: movie.world_premiere,
        budget: movie.budget,
        fees_in_usa: movie.fees_in_usa,
        fees_in_world: movie.fees_in_world,
        url: movie.url,
        draft: movie.draft,
    })
}

// ── Handlers ──

/// List published movies with their average rating.
#[utoipa::path(
    get,
    path = "/api/movies",
    params(Pagination),
    responses(
        (status = 200, description = "Published movies", body = ApiResponse<Vec<MovieListItem>>)
    ),
    tag = "movies"
)]
pub async fn list_movies(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    pagination: Pagination,
) -> Result<ApiResponse<Vec<MovieListItem>>, MarqueeError> {
    let movies = Movie::find()
        .filter(movie::Column::Draft.eq(false))
        .order_by_asc(movie::Column::Id)
        .offset(pagination.offset)
        .limit(pagination.limit)
        .all(&state.db)
        .await?;

    if movies.is_empty() {
        return Ok(ApiResponse::success(Vec::new()));
    }

    let movie_ids: Vec<i32> = movies.iter().map(|m| m.id).collect();
    let category_ids: HashSet<i32> = movies.iter().filter_map(|m| m.category_id).collect();

    let categories: HashMap<i32, String> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        category::Entity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect()
    };

    let ratings = rating::Entity::find()
        .filter(rating::Column::MovieId.is_in(movie_ids))
        .find_also_related(rating_star::Entity)
        .all(&state.db)
        .await?;

    let mut stars: HashMap<i32, Vec<i32>> = HashMap::new();
    let mut rated_by_caller: HashSet<i32> = HashSet::new();
    for (row, star) in ratings {
        if let Some(star) = star {
            stars.entry(row.movie_id).or_default().push(star.value);
        }
        if ip.as_deref() == Some(row.ip.as_str()) {
            rated_by_caller.insert(row.movie_id);
        }
    }

    let items = movies
        .into_iter()
        .map(|m| MovieListItem {
            category: m
                .category_id
                .and_then(|id| categories.get(&id).cloned())
                .unwrap_or_default(),
            rating_user: rated_by_caller.contains(&m.id),
            middle_star: stars.get(&m.id).map(|v| middle_star(v)).unwrap_or(0),
            id: m.id,
            title: m.title,
            tagline: m.tagline,
            poster: m.poster,
        })
        .collect();

    Ok(ApiResponse::success(items))
}

/// Create a movie with its credits and genres (requires authentication).
#[utoipa::path(
    post,
    path = "/api/movies",
    request_body = CreateMovieRequest,
    responses(
        (status = 201, description = "Movie created", body = ApiResponse<MovieDetail>),
        (status = 400, description = "Missing title or url"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Unknown category, person or genre"),
        (status = 409, description = "Url already used")
    ),
    tag = "movies",
    security(("bearer_auth" = []))
)]
pub async fn create_movie(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateMovieRequest>,
) -> Result<(StatusCode, ApiResponse<MovieDetail>), MarqueeError> {
    if payload.title.trim().is_empty() {
        return Err(MarqueeError::BadRequest("Missing title field!".to_string()));
    }
    if payload.url.trim().is_empty() {
        return Err(MarqueeError::BadRequest("Missing url field!".to_string()));
    }

    let taken = Movie::find()
        .filter(movie::Column::Url.eq(payload.url.as_str()))
        .one(&state.db)
        .await?;
    if taken.is_some() {
        return Err(MarqueeError::Conflict(
            "A movie with this url already exists".to_string(),
        ));
    }

    if let Some(category_id) = payload.category {
        category::Entity::find_by_id(category_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| MarqueeError::NotFound("Category not found".to_string()))?;
    }

    let directors = unique_ids(&payload.directors);
    let actors = unique_ids(&payload.actors);
    let genres = unique_ids(&payload.genres);
    ensure_actors_exist(&state.db, &directors, "director").await?;
    ensure_actors_exist(&state.db, &actors, "actor").await?;
    ensure_genres_exist(&state.db, &genres).await?;

    let txn = state.db.begin().await?;

    let created = movie::ActiveModel {
        title: Set(payload.title),
        tagline: Set(payload.tagline),
        description: Set(payload.description),
        poster: Set(payload.poster),
        year: Set(payload.year),
        country: Set(payload.country),
        world_premiere: Set(payload.world_premiere),
        budget: Set(payload.budget),
        fees_in_usa: Set(payload.fees_in_usa),
        fees_in_world: Set(payload.fees_in_world),
        category_id: Set(payload.category),
        url: Set(payload.url),
        draft: Set(payload.draft),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| MarqueeError::conflict_on_unique(e, "A movie with this url already exists"))?;

    if !directors.is_empty() {
        movie_director::Entity::insert_many(directors.iter().map(|&id| {
            movie_director::ActiveModel {
                movie_id: Set(created.id),
                director_id: Set(id),
            }
        }))
        .exec_without_returning(&txn)
        .await?;
    }
    if !actors.is_empty() {
        movie_actor::Entity::insert_many(actors.iter().map(|&id| movie_actor::ActiveModel {
            movie_id: Set(created.id),
            actor_id: Set(id),
        }))
        .exec_without_returning(&txn)
        .await?;
    }
    if !genres.is_empty() {
        movie_genre::Entity::insert_many(genres.iter().map(|&id| movie_genre::ActiveModel {
            movie_id: Set(created.id),
            genre_id: Set(id),
        }))
        .exec_without_returning(&txn)
        .await?;
    }

    txn.commit().await?;

    tracing::info!(movie_id = created.id, user_id = user.id, "created movie");
    let detail = load_detail(&state.db, created).await?;
    Ok(ApiResponse::created(detail))
}

/// Get a movie with its credits, genres and reviews.
#[utoipa::path(
    get,
    path = "/api/movies/{id}",
    params(
        ("id" = i32, Path, description = "Movie ID")
    ),
    responses(
        (status = 200, description = "Movie found", body = ApiResponse<MovieDetail>),
        (status = 404, description = "Movie not found")
    ),
    tag = "movies"
)]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<MovieDetail>, MarqueeError> {
    let movie = Movie::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| MarqueeError::NotFound(format!("Movie with id {} not found", id)))?;

    Ok(ApiResponse::success(load_detail(&state.db, movie).await?))
}
