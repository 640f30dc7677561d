//! Errors for AI content generation

/// Errors surfaced by the generation service
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GenerationError {
    /// The LLM collaborator could not be reached or refused the call
    #[error("Language model unavailable: {0}")]
    Unavailable(String),

    /// The model responded but no attempt produced a valid draft
    #[error("Generation produced no valid draft: {0}")]
    InvalidOutput(String),
}
