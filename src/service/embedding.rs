//! Embedding client over the shared OpenAI client

use rig::embeddings::EmbeddingModel;
use rig::providers::openai;

use crate::service::llm::LlmClient;

/// Environment variable for the embedding model (defaults if not set)
const ENV_EMBEDDING_MODEL: &str = "EMBEDDING_MODEL";

/// Default embedding model
const DEFAULT_MODEL: &str = openai::TEXT_EMBEDDING_3_SMALL;

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Embedding request failed: {0}")]
    RequestFailed(String),
}

/// Client for generating text embeddings
#[derive(Clone)]
pub struct EmbeddingClient {
    model: openai::EmbeddingModel,
    model_name: String,
}

impl EmbeddingClient {
    /// Create an embedding client from the shared LLM client.
    ///
    /// Optionally uses the EMBEDDING_MODEL env var.
    pub fn new(llm_client: &LlmClient) -> Self {
        let model_name =
            std::env::var(ENV_EMBEDDING_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let model = llm_client.embedding_model(&model_name);

        tracing::info!(model = %model_name, "Embedding client initialized");

        Self { model, model_name }
    }

    /// Embed a single text
    pub async fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingError> {
        let embedding = self
            .model
            .embed_text(text)
            .await
            .map_err(|e| EmbeddingError::RequestFailed(e.to_string()))?;

        tracing::debug!(
            model = %self.model_name,
            dimensions = embedding.vec.len(),
            "Generated embedding"
        );

        Ok(embedding.vec)
    }

    /// Embed a batch of texts, preserving input order
    pub async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f64>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self
            .model
            .embed_texts(texts)
            .await
            .map_err(|e| EmbeddingError::RequestFailed(e.to_string()))?;

        Ok(embeddings.into_iter().map(|e| e.vec).collect())
    }
}
