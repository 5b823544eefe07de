pub mod controllers;
pub mod migrations;
pub mod models;
pub mod openapi;

use axum::Router;
use marquee_core::AppState;

/// Every catalog route, ready to hand to [`marquee_core::App::routes`].
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(controllers::actors::routes())
        .merge(controllers::catalog::routes())
        .merge(controllers::movies::routes())
        .merge(controllers::reviews::routes())
        .merge(controllers::ratings::routes())
}
