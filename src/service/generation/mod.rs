//! AI-assisted maturity content generation
//!
//! Drafts practice statements and criteria from routed context, validates
//! the draft, and returns it together with the bundle's provenance metadata.

use rig::client::CompletionClient;
use rig::providers::openai;

use crate::model::generation::GeneratedContent;
use crate::model::{ContextBundle, ContextMetadata, ContextRequest};
use crate::service::llm::LlmClient;

pub mod error;
pub mod prompts;
pub mod validation;

pub use error::GenerationError;

use prompts::{build_generation_prompt, GENERATION_SYSTEM_PROMPT};
use validation::{sanitize_content, validate_generated_content};

/// Environment variable for the generation model (defaults if not set)
const ENV_GENERATION_MODEL: &str = "GENERATION_MODEL";

/// Default model for content generation
const DEFAULT_MODEL: &str = openai::GPT_4O_MINI;

/// Maximum attempts before giving up on an invalid draft
const MAX_ATTEMPTS: usize = 3;

/// Generated content plus the provenance the caller must render
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GenerationOutcome {
    pub content: GeneratedContent,
    pub metadata: ContextMetadata,
    /// Non-fatal quality notes from draft validation
    pub warnings: Vec<String>,
}

/// Service for generating maturity practice statements and criteria
pub struct GenerationService {
    llm_client: LlmClient,
    model: String,
}

impl GenerationService {
    /// Creates a new generation service over the shared LLM client.
    ///
    /// Optionally uses the GENERATION_MODEL env var (defaults to gpt-4o-mini).
    pub fn new(llm_client: LlmClient) -> Self {
        let model =
            std::env::var(ENV_GENERATION_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        tracing::info!(model = %model, "Generation service initialized");

        Self { llm_client, model }
    }

    /// Generate drafts from a routed context bundle.
    ///
    /// Retries a bounded number of times when the model returns a draft that
    /// fails validation; an unreachable model surfaces as `Unavailable`.
    pub async fn generate(
        &self,
        request: &ContextRequest,
        bundle: &ContextBundle,
    ) -> Result<GenerationOutcome, GenerationError> {
        let start_time = std::time::Instant::now();
        let prompt = build_generation_prompt(request, bundle);
        let prompt_length = prompt.len();

        tracing::debug!(
            organization = %request.organization_id,
            model = %self.model,
            tier = ?bundle.metadata.knowledge_tier,
            prompt_length = prompt_length,
            "Initiating OpenAI API call for content generation"
        );

        let extractor = self
            .llm_client
            .openai_client()
            .extractor::<GeneratedContent>(&self.model)
            .preamble(GENERATION_SYSTEM_PROMPT)
            .build();

        let mut last_failure = String::new();

        for attempt in 1..=MAX_ATTEMPTS {
            let content = match extractor.extract(&prompt).await {
                Ok(content) => content,
                Err(e) => {
                    let elapsed = start_time.elapsed();
                    tracing::error!(
                        organization = %request.organization_id,
                        model = %self.model,
                        attempt = attempt,
                        elapsed_ms = elapsed.as_millis(),
                        error = %e,
                        "OpenAI API call for content generation failed"
                    );
                    return Err(GenerationError::Unavailable(e.to_string()));
                }
            };

            let result = validate_generated_content(&content);
            if result.is_valid {
                let elapsed = start_time.elapsed();
                tracing::info!(
                    organization = %request.organization_id,
                    model = %self.model,
                    attempt = attempt,
                    elapsed_ms = elapsed.as_millis(),
                    statements = content.practice_statements.len(),
                    "Content generation completed"
                );

                return Ok(GenerationOutcome {
                    content,
                    metadata: bundle.metadata.clone(),
                    warnings: result.warnings,
                });
            }

            // Last chance: a draft that is structurally sound but tripped on
            // phrasing can be salvaged by stripping the offending text
            if attempt == MAX_ATTEMPTS {
                let cleaned = sanitize_content(&content);
                let retry = validate_generated_content(&cleaned);
                if retry.is_valid {
                    tracing::info!(
                        organization = %request.organization_id,
                        "Final draft accepted after sanitization"
                    );
                    let mut warnings = retry.warnings;
                    warnings.push("Draft text was sanitized before acceptance".to_string());
                    return Ok(GenerationOutcome {
                        content: cleaned,
                        metadata: bundle.metadata.clone(),
                        warnings,
                    });
                }
            }

            last_failure = result.errors.join("; ");
            tracing::warn!(
                attempt = attempt,
                errors = %last_failure,
                "Generated draft failed validation, regenerating"
            );
        }

        Err(GenerationError::InvalidOutput(last_failure))
    }
}
