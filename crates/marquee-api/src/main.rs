use marquee_api::migrations::Migrator;
use utoipa::OpenApi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    marquee_core::logging::init_for_environment(&environment);

    let app = marquee_core::App::new().await?;

    // `--migrate` / `--rollback [n]` exit after touching the schema.
    if app.handle_db_cli_args::<Migrator>().await? {
        return Ok(());
    }
    app.run_migrations::<Migrator>().await?;

    app.routes(marquee_api::routes())
        .api_docs(marquee_api::openapi::CatalogApiDoc::openapi())
        .run()
        .await
}
