use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::tokens::TokenHandler;
use crate::config::Config;

/// Shared application state available in all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub tokens: TokenHandler,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let tokens = TokenHandler::new(db.clone(), config.token_settings());
        AppState {
            db,
            config: Arc::new(config),
            tokens,
        }
    }
}

pub mod auth;
