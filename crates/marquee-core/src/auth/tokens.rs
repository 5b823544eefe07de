//! Token lifecycle: issue an access/refresh pair, rotate the access token from
//! a refresh token, and resolve a bearer token back to its user.
//!
//! Every user owns at most one row in `tokens`. Issuing upserts that row,
//! refreshing overwrites only its access half, and resolution is a lookup by
//! the exact token string.

use chrono::{Duration, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};
use thiserror::Error;

use crate::auth::jwt::{mint_token, TokenType};
use crate::config::MAX_TOKEN_LIFETIME_MINUTES;
use crate::models::{token, user};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("no token row matches the presented value")]
    NotFound,

    #[error("refresh token has expired")]
    ExpiredRefreshToken,

    #[error("token expiry is out of the representable range")]
    ExpiryOutOfRange,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("token store error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Lifetimes and signing key used when minting tokens.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    secret: String,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
    enforce_access_expiry: bool,
}

impl TokenSettings {
    pub fn new(
        secret: impl Into<String>,
        access_lifetime_minutes: u64,
        refresh_lifetime_minutes: u64,
        enforce_access_expiry: bool,
    ) -> Self {
        TokenSettings {
            secret: secret.into(),
            access_lifetime: lifetime(access_lifetime_minutes),
            refresh_lifetime: lifetime(refresh_lifetime_minutes),
            enforce_access_expiry,
        }
    }

    pub fn access_lifetime(&self) -> Duration {
        self.access_lifetime
    }

    pub fn refresh_lifetime(&self) -> Duration {
        self.refresh_lifetime
    }

    pub fn enforces_access_expiry(&self) -> bool {
        self.enforce_access_expiry
    }
}

// Values past the cap are clamped; `Config::validate` rejects them first.
fn lifetime(minutes: u64) -> Duration {
    let minutes = i64::try_from(minutes.min(MAX_TOKEN_LIFETIME_MINUTES)).unwrap_or(i64::MAX);
    Duration::try_minutes(minutes).unwrap_or(Duration::MAX)
}

/// Issues, rotates and resolves the per-user token pair.
#[derive(Debug, Clone)]
pub struct TokenHandler {
    db: DatabaseConnection,
    settings: TokenSettings,
}

impl TokenHandler {
    pub fn new(db: DatabaseConnection, settings: TokenSettings) -> Self {
        TokenHandler { db, settings }
    }

    pub fn settings(&self) -> &TokenSettings {
        &self.settings
    }

    /// Issue a fresh access/refresh pair for `user`, replacing any prior pair.
    ///
    /// The write is a single `INSERT ... ON CONFLICT (user_id) DO UPDATE`, so
    /// concurrent logins for the same user never produce a second row.
    pub async fn generate_tokens(&self, user: &user::Model) -> Result<token::Model, TokenError> {
        let access = mint_token(
            TokenType::Access,
            user.id,
            self.settings.access_lifetime,
            &self.settings.secret,
        )?;
        let refresh = mint_token(
            TokenType::Refresh,
            user.id,
            self.settings.refresh_lifetime,
            &self.settings.secret,
        )?;

        let row = token::ActiveModel {
            user_id: Set(user.id),
            access_token: Set(access.token),
            access_token_expires_at: Set(access.expires_at),
            refresh_token: Set(refresh.token),
            refresh_token_expires_at: Set(refresh.expires_at),
            ..Default::default()
        };

        token::Entity::insert(row)
            .on_conflict(
                OnConflict::column(token::Column::UserId)
                    .update_columns([
                        token::Column::AccessToken,
                        token::Column::AccessTokenExpiresAt,
                        token::Column::RefreshToken,
                        token::Column::RefreshTokenExpiresAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        let issued = token::Entity::find()
            .filter(token::Column::UserId.eq(user.id))
            .one(&self.db)
            .await?
            .ok_or(TokenError::NotFound)?;

        tracing::info!(user_id = user.id, "issued token pair");
        Ok(issued)
    }

    /// Mint a new access token from a still-valid refresh token.
    ///
    /// The refresh token and its expiry are left untouched. Concurrent
    /// refreshes of the same row are last-writer-wins.
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<token::Model, TokenError> {
        let row = token::Entity::find()
            .filter(token::Column::RefreshToken.eq(refresh_token))
            .one(&self.db)
            .await?
            .ok_or(TokenError::NotFound)?;

        if Utc::now().naive_utc() > row.refresh_token_expires_at {
            tracing::debug!(user_id = row.user_id, "refresh token expired");
            return Err(TokenError::ExpiredRefreshToken);
        }

        let access = mint_token(
            TokenType::Access,
            row.user_id,
            self.settings.access_lifetime,
            &self.settings.secret,
        )?;

        let user_id = row.user_id;
        let mut active: token::ActiveModel = row.into();
        active.access_token = Set(access.token);
        active.access_token_expires_at = Set(access.expires_at);
        let updated = active.update(&self.db).await?;

        tracing::info!(user_id, "rotated access token");
        Ok(updated)
    }

    /// Resolve an access token to its user.
    ///
    /// Unknown tokens yield `Ok(None)`. When the settings enforce access
    /// expiry, a token past `access_token_expires_at` also yields `Ok(None)`.
    pub async fn get_user_from_token(
        &self,
        access_token: &str,
    ) -> Result<Option<user::Model>, TokenError> {
        let Some(row) = token::Entity::find()
            .filter(token::Column::AccessToken.eq(access_token))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        if self.settings.enforce_access_expiry
            && Utc::now().naive_utc() > row.access_token_expires_at
        {
            tracing::debug!(user_id = row.user_id, "access token expired");
            return Ok(None);
        }

        Ok(row.find_related(user::Entity).one(&self.db).await?)
    }
}
