//! Document chunks and retrieval results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

/// An organization-scoped slice of an ingested document.
///
/// Never mutated after ingestion; the id is a content hash so re-ingesting
/// identical text is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentChunk {
    /// Content hash id (sha256 over org + document + body)
    pub id: String,
    pub document_id: String,
    pub organization_id: String,
    pub content: String,
    /// Present once the embedding worker has processed the chunk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f64>>,
    pub ingested_at: DateTime<Utc>,
}

impl DocumentChunk {
    /// Build a chunk with its content-hash id
    pub fn new(organization_id: &str, document_id: &str, content: String) -> Self {
        let id = chunk_id(organization_id, document_id, &content);
        Self {
            id,
            document_id: document_id.to_string(),
            organization_id: organization_id.to_string(),
            content,
            embedding: None,
            ingested_at: Utc::now(),
        }
    }
}

/// Compute the content-hash id for a chunk
pub fn chunk_id(organization_id: &str, document_id: &str, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(organization_id.as_bytes());
    hasher.update(document_id.as_bytes());
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A chunk ranked by semantic similarity to a query
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RankedChunk {
    pub chunk_id: String,
    pub source_document_id: String,
    pub content: String,
    pub similarity: f64,
}
