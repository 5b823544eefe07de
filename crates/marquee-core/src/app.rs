use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::config::Config;
use crate::controllers::{self, AppState};
use crate::error::MarqueeError;
use crate::openapi::ApiDoc;

const API_DOCS_PATH: &str = "/api-docs";
const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// The Marquee application: configuration, a database pool and the routers
/// mounted next to the built-in account endpoints.
pub struct App {
    pub config: Config,
    pub db: DatabaseConnection,
    custom_openapi: Option<utoipa::openapi::OpenApi>,
    custom_routes: Vec<Router<AppState>>,
}

impl App {
    /// Create an application from environment configuration.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::from_env()?;
        Self::with_config(config).await
    }

    /// Create an application with a given config.
    pub async fn with_config(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        config.validate()?;
        let db = crate::db::connect(&config).await?;

        Ok(App {
            config,
            db,
            custom_openapi: None,
            custom_routes: Vec::new(),
        })
    }

    /// Apply every pending migration known to `M`.
    pub async fn run_migrations<M: MigratorTrait>(&self) -> Result<(), sea_orm::DbErr> {
        tracing::info!("Running pending database migrations...");
        M::up(&self.db, None).await?;
        tracing::info!("Migrations complete.");
        Ok(())
    }

    /// Handle `--migrate` and `--rollback [steps]` command-line flags.
    ///
    /// Returns `true` when a database operation was performed and the caller
    /// should exit instead of serving.
    pub async fn handle_db_cli_args<M: MigratorTrait>(
        &self,
    ) -> Result<bool, Box<dyn std::error::Error>> {
        let args: Vec<String> = std::env::args().collect();

        if args.iter().any(|arg| arg == "--migrate") {
            self.run_migrations::<M>().await?;
            return Ok(true);
        }

        if let Some(pos) = args.iter().position(|arg| arg == "--rollback") {
            let steps = args
                .get(pos + 1)
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(1);
            tracing::info!("Rolling back {} migration(s)...", steps);
            M::down(&self.db, Some(steps)).await?;
            tracing::info!("Rollback complete.");
            return Ok(true);
        }

        Ok(false)
    }

    /// Merge a router whose handlers share [`AppState`]. Paths are used as given.
    pub fn routes(mut self, router: Router<AppState>) -> Self {
        self.custom_routes.push(router);
        self
    }

    /// Provide an OpenAPI spec that is merged with the account docs.
    pub fn api_docs(mut self, openapi: utoipa::openapi::OpenApi) -> Self {
        self.custom_openapi = Some(openapi);
        self
    }

    /// Handler state built from this app's pool and config.
    pub fn state(&self) -> AppState {
        AppState::new(self.db.clone(), self.config.clone())
    }

    /// Build the full router: account routes, custom routes and API docs.
    pub fn router(&self) -> Router {
        let state = self.state();

        let openapi_spec = match &self.custom_openapi {
            Some(app_spec) => crate::openapi::merge_openapi(ApiDoc::openapi(), app_spec.clone()),
            None => ApiDoc::openapi(),
        };
        let openapi_json = openapi_spec.clone();

        let mut api: Router<AppState> =
            Router::new().nest("/api/auth", controllers::auth::routes());
        for custom in &self.custom_routes {
            api = api.merge(custom.clone());
        }

        let mut router = Router::new()
            .route("/", get(welcome))
            .merge(api.with_state(state))
            .merge(Scalar::with_url(API_DOCS_PATH, openapi_spec))
            .route(
                OPENAPI_JSON_PATH,
                get(move || {
                    let spec = openapi_json.clone();
                    async move { axum::Json(spec) }
                }),
            )
            .fallback(not_found)
            .layer(CorsLayer::permissive());

        // Request tracing and request ids only in development.
        if self.config.is_dev() {
            use tower_http::trace::DefaultMakeSpan;
            use tower_http::trace::DefaultOnRequest;
            use tower_http::trace::DefaultOnResponse;
            use tower_http::LatencyUnit;

            let x_request_id = axum::http::HeaderName::from_static("x-request-id");
            // Router::layer wraps outward: the id is set before it is propagated.
            router = router
                .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
                .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                        .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                        .on_response(
                            DefaultOnResponse::new()
                                .level(tracing::Level::INFO)
                                .latency_unit(LatencyUnit::Millis),
                        ),
                );
        }

        router
    }

    /// Serve until Ctrl+C.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.config.server_addr();
        let router = self.router();

        tracing::info!(
            "Marquee server running on http://{} (docs at http://{}{})",
            addr,
            addr,
            API_DOCS_PATH
        );

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down Marquee server...");
}

#[derive(Serialize)]
struct WelcomeMessage {
    message: &'static str,
    docs: &'static str,
    status: &'static str,
}

/// Welcome page at `/`.
async fn welcome() -> impl IntoResponse {
    axum::Json(WelcomeMessage {
        message: "Welcome to Marquee!",
        docs: API_DOCS_PATH,
        status: "running",
    })
}

async fn not_found() -> MarqueeError {
    MarqueeError::NotFound("No route matches this path".to_string())
}
