pub mod cache;
pub mod classifier;
pub mod embedding;
pub mod generation;
pub mod ingest;
pub mod insights;
pub mod llm;
pub mod profiles;
pub mod retrieval;
pub mod scoring;
pub mod search;

pub use cache::ContextCache;
pub use embedding::EmbeddingClient;
pub use generation::GenerationService;
pub use ingest::{EmbeddingWorker, IngestService};
pub use insights::DbInsightStore;
pub use llm::LlmClient;
pub use profiles::DbOrganizationStore;
pub use retrieval::ContextRouter;
pub use search::SemanticSearchService;
