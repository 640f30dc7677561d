//! Repositories for chunk, organization, and insight database operations
//!
//! All query methods take `organization_id` as a plain filter predicate;
//! tenancy is scoping, not a concurrency primitive.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::models::{
    threat_sensitivity_to_string, DocumentChunkRow, ExternalInsightRow, ListChunksQuery,
    OrganizationProfileRow, PaginatedChunks,
};
use super::DbError;
use crate::model::{DocumentChunk, ExternalInsight, OrganizationProfile};

const DEFAULT_PAGE_SIZE: u32 = 20;

/// Repository for document chunk operations
#[derive(Clone)]
pub struct ChunkRepository {
    pool: PgPool,
}

impl ChunkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or update a document chunk
    pub async fn upsert(&self, chunk: &DocumentChunk) -> Result<(), DbError> {
        let embedding_json = chunk
            .embedding
            .as_ref()
            .map(|e| serde_json::to_value(e).unwrap_or_default());

        sqlx::query(
            r#"
            INSERT INTO document_chunks (
                id, document_id, organization_id, content, embedding, ingested_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                document_id = EXCLUDED.document_id,
                content = EXCLUDED.content,
                embedding = COALESCE(EXCLUDED.embedding, document_chunks.embedding)
            "#,
        )
        .bind(&chunk.id)
        .bind(&chunk.document_id)
        .bind(&chunk.organization_id)
        .bind(&chunk.content)
        .bind(&embedding_json)
        .bind(chunk.ingested_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %chunk.id, organization = %chunk.organization_id, "Upserted document chunk");
        Ok(())
    }

    /// Get a chunk by ID
    pub async fn get_by_id(&self, id: &str) -> Result<DocumentChunk, DbError> {
        let row: DocumentChunkRow =
            sqlx::query_as("SELECT * FROM document_chunks WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| DbError::NotFound(id.to_string()))?;

        row.into_domain().map_err(DbError::Serialization)
    }

    /// Delete a chunk by ID
    /// Returns true if the chunk was deleted, false if it didn't exist
    pub async fn delete(&self, id: &str) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM document_chunks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(id = %id, "Deleted document chunk");
        }

        Ok(deleted)
    }

    /// All embedded chunks for one organization, for in-process similarity ranking
    pub async fn embedded_for_organization(
        &self,
        organization_id: &str,
    ) -> Result<Vec<DocumentChunk>, DbError> {
        let rows: Vec<DocumentChunkRow> = sqlx::query_as(
            r#"
            SELECT * FROM document_chunks
            WHERE organization_id = $1 AND embedding IS NOT NULL
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_domain().ok())
            .collect())
    }

    /// Oldest chunks still awaiting an embedding, up to `limit`
    pub async fn pending_embedding(&self, limit: i64) -> Result<Vec<DocumentChunk>, DbError> {
        let rows: Vec<DocumentChunkRow> = sqlx::query_as(
            r#"
            SELECT * FROM document_chunks
            WHERE embedding IS NULL
            ORDER BY ingested_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_domain().ok())
            .collect())
    }

    /// Store the embedding for a chunk
    pub async fn set_embedding(&self, id: &str, embedding: &[f64]) -> Result<(), DbError> {
        let embedding_json =
            serde_json::to_value(embedding).map_err(|e| DbError::Serialization(e.to_string()))?;

        sqlx::query("UPDATE document_chunks SET embedding = $2 WHERE id = $1")
            .bind(id)
            .bind(&embedding_json)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List chunks with pagination and filters
    pub async fn list(&self, query: ListChunksQuery) -> Result<PaginatedChunks, DbError> {
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).min(100);
        let offset = (page - 1) * page_size;

        // Build dynamic query
        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(ref org) = query.organization_id {
            params.push(org.clone());
            conditions.push(format!("organization_id = ${}", params.len()));
        }

        if let Some(ref doc) = query.document_id {
            params.push(doc.clone());
            conditions.push(format!("document_id = ${}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!(
            "SELECT COUNT(*) as count FROM document_chunks {}",
            where_clause
        );

        let total_count: i64 = {
            let mut q = sqlx::query_scalar(&count_query);
            for param in &params {
                q = q.bind(param);
            }
            q.fetch_one(&self.pool).await?
        };

        let select_query = format!(
            r#"
            SELECT * FROM document_chunks
            {}
            ORDER BY ingested_at DESC
            LIMIT {} OFFSET {}
            "#,
            where_clause, page_size, offset
        );

        let rows: Vec<DocumentChunkRow> = {
            let mut q = sqlx::query_as(&select_query);
            for param in &params {
                q = q.bind(param);
            }
            q.fetch_all(&self.pool).await?
        };

        let chunks: Vec<DocumentChunk> = rows
            .into_iter()
            .filter_map(|row| row.into_domain().ok())
            .collect();

        let total_pages = ((total_count as f64) / (page_size as f64)).ceil() as u32;

        Ok(PaginatedChunks {
            chunks,
            page,
            page_size,
            total_count,
            total_pages,
        })
    }
}

/// Repository for organization profile operations
#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get an organization profile by ID
    pub async fn get(&self, organization_id: &str) -> Result<OrganizationProfile, DbError> {
        let row: OrganizationProfileRow =
            sqlx::query_as("SELECT * FROM organization_profiles WHERE organization_id = $1")
                .bind(organization_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| DbError::NotFound(organization_id.to_string()))?;

        Ok(row.into_domain())
    }

    /// Insert or update an organization profile
    pub async fn upsert(&self, profile: &OrganizationProfile) -> Result<(), DbError> {
        let industry_tags = serde_json::to_value(&profile.industry_tags)
            .map_err(|e| DbError::Serialization(e.to_string()))?;
        let risk_concerns = serde_json::to_value(&profile.risk_concerns)
            .map_err(|e| DbError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO organization_profiles (
                organization_id, name, industry_tags, operating_region, size_band,
                structure_summary, risk_concerns, threat_sensitivity, ai_governance_policy
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (organization_id) DO UPDATE SET
                name = EXCLUDED.name,
                industry_tags = EXCLUDED.industry_tags,
                operating_region = EXCLUDED.operating_region,
                size_band = EXCLUDED.size_band,
                structure_summary = EXCLUDED.structure_summary,
                risk_concerns = EXCLUDED.risk_concerns,
                threat_sensitivity = EXCLUDED.threat_sensitivity,
                ai_governance_policy = EXCLUDED.ai_governance_policy
            "#,
        )
        .bind(&profile.organization_id)
        .bind(&profile.name)
        .bind(&industry_tags)
        .bind(&profile.operating_region)
        .bind(&profile.size_band)
        .bind(&profile.structure_summary)
        .bind(&risk_concerns)
        .bind(threat_sensitivity_to_string(&profile.threat_sensitivity))
        .bind(&profile.ai_governance_policy)
        .execute(&self.pool)
        .await?;

        tracing::debug!(organization = %profile.organization_id, "Upserted organization profile");
        Ok(())
    }
}

/// Repository for external insight operations
#[derive(Clone)]
pub struct InsightRepository {
    pool: PgPool,
}

impl InsightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Verified insights published at or after `since`
    pub async fn verified_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<ExternalInsight>, DbError> {
        let rows: Vec<ExternalInsightRow> = sqlx::query_as(
            r#"
            SELECT * FROM external_insights
            WHERE verified = TRUE AND published_at >= $1
            ORDER BY published_at DESC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.into_domain()).collect())
    }

    /// Insert or update an insight record
    pub async fn upsert(&self, insight: &ExternalInsight) -> Result<(), DbError> {
        let tags = serde_json::to_value(&insight.tags)
            .map_err(|e| DbError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO external_insights (id, title, summary, tags, verified, published_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                summary = EXCLUDED.summary,
                tags = EXCLUDED.tags,
                verified = EXCLUDED.verified,
                published_at = EXCLUDED.published_at
            "#,
        )
        .bind(&insight.id)
        .bind(&insight.title)
        .bind(&insight.summary)
        .bind(&tags)
        .bind(insight.verified)
        .bind(insight.published_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
