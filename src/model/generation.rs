//! LLM extraction types for AI-assisted content generation

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A generated maturity practice statement draft with its criteria
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedPracticeStatement {
    /// Short name of the practice statement
    pub name: String,

    /// Intent: what the practice achieves when mature
    #[schemars(description = "One or two sentences describing the intent of the practice")]
    pub intent: String,

    /// Criteria drafts, one per assessable behavior
    pub criteria: Vec<GeneratedCriterion>,

    /// Step-by-step grounding explanation for auditability
    #[schemars(
        description = "Which parts of the supplied context informed this draft (optional but recommended)"
    )]
    pub reasoning: Option<String>,
}

/// A single generated assessment criterion
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedCriterion {
    /// The assessable statement
    pub statement: String,

    /// Per-level descriptors, basic through resilient, in order
    #[schemars(
        description = "Exactly five descriptors, one per maturity level from basic to resilient"
    )]
    pub level_descriptors: Vec<String>,
}

/// Full generation output for one request
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedContent {
    pub practice_statements: Vec<GeneratedPracticeStatement>,
}
