use actix_web::{web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod db;
mod model;
mod service;

use app::AppState;
use model::Config;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    let state = AppState::new(config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize application");
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    // Background embedding backfill
    state.embedding_worker.spawn();

    let db_pool = web::Data::new(state.db_pool);
    let cache = web::Data::new(state.cache);
    let context_router = web::Data::new(state.context_router);
    let generation_service = web::Data::new(state.generation_service);
    let ingest_service = web::Data::new(state.ingest_service);
    let chunk_repository = web::Data::new(state.chunk_repository);
    let organization_repository = web::Data::new(state.organization_repository);
    let insight_repository = web::Data::new(state.insight_repository);

    tracing::info!("Starting Maturity Intel server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(db_pool.clone())
            .app_data(cache.clone())
            .app_data(context_router.clone())
            .app_data(generation_service.clone())
            .app_data(ingest_service.clone())
            .app_data(chunk_repository.clone())
            .app_data(organization_repository.clone())
            .app_data(insight_repository.clone())
            .configure(api::scoring::configure)
            .configure(api::context::configure)
            .configure(api::document::configure)
            .configure(api::organization::configure)
            .configure(api::insight::configure)
            .configure(api::health::configure)
            .configure(api::openapi::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
