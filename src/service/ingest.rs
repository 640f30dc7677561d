//! Document ingestion and the background embedding worker
//!
//! Ingestion splits document text into overlapping chunks and persists them
//! without embeddings. The worker backfills embeddings in batches with a
//! bounded-retry, exponential-backoff loop.

use std::time::Duration;

use crate::db::repository::ChunkRepository;
use crate::db::DbError;
use crate::model::DocumentChunk;
use crate::service::embedding::EmbeddingClient;

/// Target chunk size in characters
const CHUNK_SIZE: usize = 1_200;

/// Overlap between consecutive chunks
const CHUNK_OVERLAP: usize = 200;

/// How many chunks the worker embeds per batch
const EMBED_BATCH_SIZE: i64 = 16;

/// Idle wait between polls when no chunks are pending
const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Maximum embedding attempts per batch before parking until the next poll
const MAX_BATCH_ATTEMPTS: u32 = 4;

/// Base delay for exponential backoff between batch attempts
const BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Service for ingesting documents as organization-scoped chunks
pub struct IngestService {
    repository: ChunkRepository,
}

impl IngestService {
    pub fn new(repository: ChunkRepository) -> Self {
        Self { repository }
    }

    /// Split a document into chunks and persist them.
    /// Returns the ids of the stored chunks; embeddings are backfilled
    /// asynchronously by the worker.
    pub async fn ingest_document(
        &self,
        organization_id: &str,
        document_id: &str,
        text: &str,
    ) -> Result<Vec<String>, DbError> {
        let pieces = split_into_chunks(text, CHUNK_SIZE, CHUNK_OVERLAP);
        let mut ids = Vec::with_capacity(pieces.len());

        for piece in pieces {
            let chunk = DocumentChunk::new(organization_id, document_id, piece);
            let id = chunk.id.clone();
            self.repository.upsert(&chunk).await?;
            ids.push(id);
        }

        tracing::info!(
            organization = %organization_id,
            document = %document_id,
            chunks = ids.len(),
            "Document ingested, embeddings queued"
        );

        Ok(ids)
    }
}

/// Split text into overlapping character chunks, respecting char boundaries
pub fn split_into_chunks(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let step = chunk_size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let piece: String = chars[start..end].iter().collect();
        let piece = piece.trim().to_string();
        if !piece.is_empty() {
            chunks.push(piece);
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}

/// Background worker that backfills chunk embeddings.
///
/// Replaces client-side timer loops with an explicit bounded-retry batch
/// loop owned by the runtime.
pub struct EmbeddingWorker {
    repository: ChunkRepository,
    embedding_client: EmbeddingClient,
}

impl EmbeddingWorker {
    pub fn new(repository: ChunkRepository, embedding_client: EmbeddingClient) -> Self {
        Self {
            repository,
            embedding_client,
        }
    }

    /// Spawn the worker loop onto the runtime
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!("Embedding worker started");
            loop {
                match self.run_once().await {
                    Ok(0) => tokio::time::sleep(POLL_INTERVAL).await,
                    Ok(processed) => {
                        tracing::debug!(processed = processed, "Embedded chunk batch");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Embedding pass failed, parking until next poll");
                        tokio::time::sleep(POLL_INTERVAL).await;
                    }
                }
            }
        })
    }

    /// Process one pending batch; returns the number of chunks embedded
    pub async fn run_once(&self) -> Result<usize, DbError> {
        let pending = self.repository.pending_embedding(EMBED_BATCH_SIZE).await?;
        if pending.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = pending.iter().map(|c| c.content.clone()).collect();

        for attempt in 1..=MAX_BATCH_ATTEMPTS {
            match self.embedding_client.embed_batch(texts.clone()).await {
                Ok(embeddings) => {
                    for (chunk, embedding) in pending.iter().zip(embeddings.iter()) {
                        self.repository.set_embedding(&chunk.id, embedding).await?;
                    }
                    return Ok(pending.len());
                }
                Err(e) => {
                    if attempt == MAX_BATCH_ATTEMPTS {
                        tracing::warn!(
                            error = %e,
                            attempts = attempt,
                            batch = pending.len(),
                            "Embedding batch failed after max attempts"
                        );
                        return Ok(0);
                    }
                    let delay = backoff_delay(attempt);
                    tracing::debug!(
                        error = %e,
                        attempt = attempt,
                        delay_ms = delay.as_millis(),
                        "Embedding batch failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Ok(0)
    }
}

/// Exponential backoff delay for the given 1-based attempt number
fn backoff_delay(attempt: u32) -> Duration {
    BACKOFF_BASE * 2u32.saturating_pow(attempt.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = split_into_chunks("short document", 100, 20);
        assert_eq!(chunks, vec!["short document".to_string()]);
    }

    #[test]
    fn test_empty_text_no_chunks() {
        assert!(split_into_chunks("", 100, 20).is_empty());
        assert!(split_into_chunks("   ", 100, 20).is_empty());
    }

    #[test]
    fn test_chunks_overlap() {
        let text = "abcdefghij".repeat(10); // 100 chars
        let chunks = split_into_chunks(&text, 40, 10);

        assert!(chunks.len() > 1);
        // Each chunk starts 30 chars after the previous, so the last 10
        // chars of one chunk open the next
        let tail: String = chunks[0].chars().skip(30).collect();
        assert!(chunks[1].starts_with(&tail));
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_delay(1), Duration::from_millis(500));
        assert_eq!(backoff_delay(2), Duration::from_millis(1000));
        assert_eq!(backoff_delay(3), Duration::from_millis(2000));
        assert_eq!(backoff_delay(4), Duration::from_millis(4000));
    }
}
