//! Database module for PostgreSQL persistence

pub mod models;
pub mod repository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;

// Environment variable names
const ENV_POSTGRES_HOST: &str = "MATURITY_INTEL_POSTGRES_HOST";
const ENV_POSTGRES_PORT: &str = "MATURITY_INTEL_POSTGRES_PORT";
const ENV_POSTGRES_USER: &str = "MATURITY_INTEL_POSTGRES_USER";
const ENV_POSTGRES_PASSWORD: &str = "MATURITY_INTEL_POSTGRES_PASSWORD";
const ENV_POSTGRES_DB: &str = "MATURITY_INTEL_POSTGRES_DB";

// Default values
const DEFAULT_POSTGRES_HOST: &str = "127.0.0.1";
const DEFAULT_POSTGRES_PORT: &str = "5432";
const DEFAULT_POSTGRES_USER: &str = "maturity_intel";
const DEFAULT_POSTGRES_PASSWORD: &str = "maturity_intel";
const DEFAULT_POSTGRES_DB: &str = "maturity_intel";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Create a new database connection pool
pub async fn create_pool() -> Result<PgPool, DbError> {
    let host = env::var(ENV_POSTGRES_HOST).unwrap_or_else(|_| DEFAULT_POSTGRES_HOST.to_string());
    let port = env::var(ENV_POSTGRES_PORT).unwrap_or_else(|_| DEFAULT_POSTGRES_PORT.to_string());
    let user = env::var(ENV_POSTGRES_USER).unwrap_or_else(|_| DEFAULT_POSTGRES_USER.to_string());
    let password =
        env::var(ENV_POSTGRES_PASSWORD).unwrap_or_else(|_| DEFAULT_POSTGRES_PASSWORD.to_string());
    let database = env::var(ENV_POSTGRES_DB).unwrap_or_else(|_| DEFAULT_POSTGRES_DB.to_string());

    let database_url = format!(
        "postgres://{}:{}@{}:{}/{}",
        user, password, host, port, database
    );

    tracing::debug!(host = %host, port = %port, database = %database, "Connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    tracing::info!(host = %host, port = %port, "PostgreSQL connection established");

    Ok(pool)
}

/// Initialize database schema
pub async fn init_schema(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS document_chunks (
            id VARCHAR(64) PRIMARY KEY,
            document_id VARCHAR(128) NOT NULL,
            organization_id VARCHAR(128) NOT NULL,
            content TEXT NOT NULL,
            embedding JSONB,
            ingested_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS organization_profiles (
            organization_id VARCHAR(128) PRIMARY KEY,
            name TEXT NOT NULL,
            industry_tags JSONB NOT NULL DEFAULT '[]',
            operating_region TEXT,
            size_band VARCHAR(50),
            structure_summary TEXT,
            risk_concerns JSONB NOT NULL DEFAULT '[]',
            threat_sensitivity VARCHAR(20) NOT NULL DEFAULT 'basic',
            ai_governance_policy TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS external_insights (
            id VARCHAR(64) PRIMARY KEY,
            title TEXT NOT NULL,
            summary TEXT NOT NULL,
            tags JSONB NOT NULL DEFAULT '[]',
            verified BOOLEAN NOT NULL DEFAULT FALSE,
            published_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes separately
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_document_chunks_organization_id ON document_chunks(organization_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_document_chunks_document_id ON document_chunks(document_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_document_chunks_pending_embedding ON document_chunks(ingested_at) WHERE embedding IS NULL",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_external_insights_published_at ON external_insights(published_at)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database schema initialized");

    Ok(())
}
