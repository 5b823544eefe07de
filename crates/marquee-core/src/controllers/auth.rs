use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, patch, post, put},
    Router,
};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidateEmail;

use crate::auth::{hash_password, verify_password};
use crate::error::MarqueeError;
use crate::extractors::{AuthUser, ClientIp, Json};
use crate::models::token;
use crate::models::user::{self, Entity as User, UserResponse};
use crate::response::ApiResponse;

use super::AppState;

// ── Request / Response types ──

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub access_token_expires_at: NaiveDateTime,
    pub refresh_token: String,
    pub refresh_token_expires_at: NaiveDateTime,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
    pub access_token_expires_at: NaiveDateTime,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePasswordRequest {
    pub username: String,
    pub password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        MessageResponse {
            message: message.to_string(),
        }
    }
}

// ── Routes ──

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/profile", patch(update_profile))
        .route("/update_password", put(update_password))
        .route("/delete-account", delete(delete_account))
}

// ── Handlers ──

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Missing field, short password or invalid email"),
        (status = 409, description = "Username already taken")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, ApiResponse<MessageResponse>), MarqueeError> {
    if payload.username.is_empty() {
        return Err(MarqueeError::BadRequest("Missing username field!".to_string()));
    }
    if payload.email.is_empty() {
        return Err(MarqueeError::BadRequest("Missing email field!".to_string()));
    }
    if payload.password.is_empty() {
        return Err(MarqueeError::BadRequest("Missing password field!".to_string()));
    }
    if payload.password.len() < state.config.min_password_length {
        return Err(MarqueeError::BadRequest("Password too short!".to_string()));
    }

    let existing = User::find()
        .filter(user::Column::Username.eq(&payload.username))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(MarqueeError::Conflict(
            "This username is already taken!".to_string(),
        ));
    }

    if !payload.email.validate_email() {
        return Err(MarqueeError::BadRequest("Invalid email format!".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let now = Utc::now().naive_utc();

    let new_user = user::ActiveModel {
        username: Set(payload.username),
        email: Set(payload.email),
        password_hash: Set(password_hash),
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    // A concurrent registration can still win the race past the lookup above.
    let user_model = new_user
        .insert(&state.db)
        .await
        .map_err(|e| MarqueeError::conflict_on_unique(e, "This username is already taken!"))?;

    tracing::info!(user_id = user_model.id, username = %user_model.username, "registered account");

    Ok(ApiResponse::created(MessageResponse::new(
        "You have Registered Successfully",
    )))
}

/// Log in and receive a fresh access/refresh token pair.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials"),
        (status = 404, description = "Unknown username")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(payload): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, MarqueeError> {
    let user_model = User::find()
        .filter(user::Column::Username.eq(&payload.username))
        .one(&state.db)
        .await?
        .ok_or_else(|| MarqueeError::NotFound("User not found".to_string()))?;

    let is_valid = verify_password(&payload.password, &user_model.password_hash)?;
    if !is_valid || !user_model.is_active {
        tracing::warn!(
            username = %payload.username,
            ip = ip.as_deref().unwrap_or("unknown"),
            "rejected login"
        );
        return Err(MarqueeError::BadRequest("Invalid credentials".to_string()));
    }

    let issued = state.tokens.generate_tokens(&user_model).await?;

    Ok(ApiResponse::success(LoginResponse {
        access_token: issued.access_token,
        access_token_expires_at: issued.access_token_expires_at,
        refresh_token: issued.refresh_token,
        refresh_token_expires_at: issued.refresh_token_expires_at,
        user: UserResponse::from(user_model),
    }))
}

/// Mint a new access token from a refresh token.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Access token rotated", body = ApiResponse<RefreshResponse>),
        (status = 401, description = "Refresh token expired, log in again"),
        (status = 404, description = "Unknown refresh token")
    ),
    tag = "auth"
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<ApiResponse<RefreshResponse>, MarqueeError> {
    let rotated = state.tokens.refresh_tokens(&payload.refresh_token).await?;

    Ok(ApiResponse::success(RefreshResponse {
        access_token: rotated.access_token,
        access_token_expires_at: rotated.access_token_expires_at,
    }))
}

/// Update the authenticated user's profile fields.
#[utoipa::path(
    patch,
    path = "/api/auth/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Invalid email address"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Username already taken")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<ApiResponse<MessageResponse>, MarqueeError> {
    if let Some(ref email) = payload.email {
        if !email.validate_email() {
            return Err(MarqueeError::BadRequest("Invalid email address".to_string()));
        }
    }

    if let Some(ref username) = payload.username {
        if username.is_empty() {
            return Err(MarqueeError::BadRequest("Missing username field!".to_string()));
        }
        if *username != current.username {
            let taken = User::find()
                .filter(user::Column::Username.eq(username))
                .one(&state.db)
                .await?;
            if taken.is_some() {
                return Err(MarqueeError::Conflict(
                    "This username is already taken!".to_string(),
                ));
            }
        }
    }

    let user_id = current.id;
    let mut active: user::ActiveModel = current.into();
    if let Some(username) = payload.username {
        active.username = Set(username);
    }
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(first_name) = payload.first_name {
        active.first_name = Set(Some(first_name));
    }
    if let Some(last_name) = payload.last_name {
        active.last_name = Set(Some(last_name));
    }
    active.updated_at = Set(Utc::now().naive_utc());
    active
        .update(&state.db)
        .await
        .map_err(|e| MarqueeError::conflict_on_unique(e, "This username is already taken!"))?;

    tracing::info!(user_id, "updated profile");
    Ok(ApiResponse::success(MessageResponse::new(
        "Profile updated successfully",
    )))
}

/// Change the authenticated user's password.
#[utoipa::path(
    put,
    path = "/api/auth/update_password",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Incorrect password or new password too short"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Username belongs to another account"),
        (status = 404, description = "No such user")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<ApiResponse<MessageResponse>, MarqueeError> {
    let target = User::find()
        .filter(user::Column::Username.eq(&payload.username))
        .one(&state.db)
        .await?
        .ok_or_else(|| MarqueeError::NotFound("No such user exists".to_string()))?;

    if target.id != current.id {
        return Err(MarqueeError::Forbidden(
            "You can only change your own password".to_string(),
        ));
    }

    if !verify_password(&payload.password, &target.password_hash)? {
        return Err(MarqueeError::BadRequest("Incorrect password".to_string()));
    }

    if payload.new_password.len() < state.config.min_password_length {
        return Err(MarqueeError::BadRequest("Password too short!".to_string()));
    }

    let new_hash = hash_password(&payload.new_password)?;
    let mut active: user::ActiveModel = target.into();
    active.password_hash = Set(new_hash);
    active.updated_at = Set(Utc::now().naive_utc());
    active.update(&state.db).await?;

    tracing::info!(user_id = current.id, "changed password");
    Ok(ApiResponse::success(MessageResponse::new(
        "Password updated successfully",
    )))
}

/// Delete the authenticated user's account together with its tokens.
#[utoipa::path(
    delete,
    path = "/api/auth/delete-account",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(current): AuthUser,
) -> Result<StatusCode, MarqueeError> {
    let txn = state.db.begin().await?;

    token::Entity::delete_many()
        .filter(token::Column::UserId.eq(current.id))
        .exec(&txn)
        .await?;
    User::delete_by_id(current.id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(user_id = current.id, "deleted account");
    Ok(StatusCode::NO_CONTENT)
}
