//! Semantic document search over organization-scoped chunks

use async_trait::async_trait;

use crate::db::repository::ChunkRepository;
use crate::db::DbError;
use crate::model::RankedChunk;
use crate::service::embedding::{EmbeddingClient, EmbeddingError};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Document retrieval collaborator: semantic search over previously
/// ingested, chunked, embedded documents scoped by organization.
#[async_trait]
pub trait DocumentSearch: Send + Sync {
    /// Ranked chunks for `query` within one organization, best first.
    /// Returns at most `limit` results at or above `threshold` similarity.
    async fn search(
        &self,
        query: &str,
        organization_id: &str,
        limit: usize,
        threshold: f64,
    ) -> Result<Vec<RankedChunk>, SearchError>;
}

/// In-process cosine ranking over org-scoped embedded chunks
pub struct SemanticSearchService {
    repository: ChunkRepository,
    embedding_client: EmbeddingClient,
}

impl SemanticSearchService {
    pub fn new(repository: ChunkRepository, embedding_client: EmbeddingClient) -> Self {
        Self {
            repository,
            embedding_client,
        }
    }
}

#[async_trait]
impl DocumentSearch for SemanticSearchService {
    async fn search(
        &self,
        query: &str,
        organization_id: &str,
        limit: usize,
        threshold: f64,
    ) -> Result<Vec<RankedChunk>, SearchError> {
        let query_embedding = self.embedding_client.embed(query).await?;

        let chunks = self
            .repository
            .embedded_for_organization(organization_id)
            .await?;

        let mut ranked: Vec<RankedChunk> = chunks
            .into_iter()
            .filter_map(|chunk| {
                let embedding = chunk.embedding.as_ref()?;
                let similarity = cosine_similarity(&query_embedding, embedding);
                if similarity >= threshold {
                    Some(RankedChunk {
                        chunk_id: chunk.id,
                        source_document_id: chunk.document_id,
                        content: chunk.content,
                        similarity,
                    })
                } else {
                    None
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(limit);

        tracing::debug!(
            organization = %organization_id,
            query_preview = query.chars().take(60).collect::<String>(),
            results = ranked.len(),
            "Semantic search completed"
        );

        Ok(ranked)
    }
}

/// Cosine similarity of two vectors; 0.0 when either has no magnitude
/// or the dimensions disagree
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![0.5, 0.3, 0.8];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_mismatched_or_empty() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
