//! Application state and service initialization
//!
//! This module centralizes all service initialization and dependency injection,
//! making it easier to manage the application lifecycle and test services.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::repository::{ChunkRepository, InsightRepository, OrganizationRepository};
use crate::model::Config;
use crate::service::{
    ContextCache, ContextRouter, DbInsightStore, DbOrganizationStore, EmbeddingClient,
    EmbeddingWorker, GenerationService, IngestService, LlmClient, SemanticSearchService,
};

/// Application state containing all services and shared resources
///
/// This struct centralizes service initialization and makes it easy to inject
/// dependencies into Actix-web handlers.
pub struct AppState {
    /// Database connection pool
    pub db_pool: PgPool,
    /// Redis cache (optional)
    pub cache: Option<ContextCache>,
    /// Tiered context router
    pub context_router: ContextRouter,
    /// LLM content generation service
    pub generation_service: GenerationService,
    /// Document chunking and persistence service
    pub ingest_service: IngestService,
    /// Chunk repository, exposed directly for the document API
    pub chunk_repository: ChunkRepository,
    /// Organization repository, exposed for the profile API
    pub organization_repository: OrganizationRepository,
    /// Insight repository, exposed for the insight API
    pub insight_repository: InsightRepository,
    /// Background embedding backfill worker
    pub embedding_worker: EmbeddingWorker,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Database connection and schema initialization
    /// 2. Redis cache initialization (optional)
    /// 3. LLM client initialization (requires OPENAI_API_KEY)
    /// 4. Service dependency graph construction
    pub async fn new(config: Config) -> Result<Self, AppError> {
        // Initialize PostgreSQL database
        let db_pool = crate::db::create_pool()
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        // Initialize database schema
        crate::db::init_schema(&db_pool)
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        // Initialize Redis cache (optional - will log warning if Redis is unavailable)
        let cache = match ContextCache::new().await {
            Ok(cache) => {
                tracing::info!("Redis cache enabled");
                Some(cache)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Redis cache unavailable, running without cache");
                None
            }
        };

        // Create shared LLM client (required)
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AppError::MissingConfig("OPENAI_API_KEY"))?;

        let llm_client = LlmClient::new(&api_key);

        let embedding_client = EmbeddingClient::new(&llm_client);

        // Repositories share the pool
        let chunk_repository = ChunkRepository::new(db_pool.clone());
        let organization_repository = OrganizationRepository::new(db_pool.clone());
        let insight_repository = InsightRepository::new(db_pool.clone());

        // Build the retrieval collaborators behind their trait seams
        let search = Arc::new(SemanticSearchService::new(
            chunk_repository.clone(),
            embedding_client.clone(),
        ));
        let insights = Arc::new(DbInsightStore::new(insight_repository.clone()));
        let profiles = Arc::new(DbOrganizationStore::new(
            organization_repository.clone(),
            cache.clone(),
        ));

        let context_router =
            ContextRouter::new(search, insights, profiles, config.retrieval.clone());

        let generation_service = GenerationService::new(llm_client);

        let ingest_service = IngestService::new(chunk_repository.clone());

        let embedding_worker =
            EmbeddingWorker::new(chunk_repository.clone(), embedding_client);

        Ok(Self {
            db_pool,
            cache,
            context_router,
            generation_service,
            ingest_service,
            chunk_repository,
            organization_repository,
            insight_repository,
            embedding_worker,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Database initialization failed
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),
}
