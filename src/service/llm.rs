//! Shared OpenAI client for generation and embeddings
//!
//! One client per process; generation and embedding services borrow it to
//! build extractors and embedding models with their own model selection.

use rig::client::EmbeddingsClient;
use rig::providers::openai;

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
}

impl LlmClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: openai::Client::new(api_key),
        }
    }

    /// The underlying OpenAI client, for building extractors and
    /// embedding models
    pub fn openai_client(&self) -> &openai::Client {
        &self.client
    }

    /// An embedding model handle for the given model name
    pub fn embedding_model(&self, model_name: &str) -> openai::EmbeddingModel {
        self.client.embedding_model(model_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_and_model_handles_construct() {
        let client = LlmClient::new("test-key");
        let _ = client.embedding_model(openai::TEXT_EMBEDDING_3_SMALL);
        let _ = client.clone();
    }
}
