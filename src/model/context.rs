//! Knowledge tiers, AI context requests, and composed context bundles

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Knowledge tier governing which content sources may inform an AI response.
///
/// Exactly one tier is assigned per request evaluation. `General` is the
/// unclassified lowest-trust default: no privileged content is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeTier {
    /// Governance/audit content: generation, scoring, compliance
    InternalSecure,
    /// Organization metadata and structure
    OrganizationalContext,
    /// Advisory threat intelligence, never scoring-relevant
    ExternalAwareness,
    /// Unclassified, general-purpose
    General,
}

/// Whether the composed context is drawn from internal or external sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Internal,
    External,
}

impl KnowledgeTier {
    pub fn source_type(self) -> SourceType {
        match self {
            KnowledgeTier::InternalSecure | KnowledgeTier::OrganizationalContext => {
                SourceType::Internal
            }
            KnowledgeTier::ExternalAwareness | KnowledgeTier::General => SourceType::External,
        }
    }
}

/// An incoming AI request to classify and contextualize
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ContextRequest {
    pub organization_id: String,
    pub prompt_text: String,
    #[serde(default)]
    pub free_text_context: String,
    /// Domain-scoped requests default to the secure tier
    pub current_domain: Option<String>,
    #[serde(default = "default_true")]
    pub allow_external_context: bool,
}

fn default_true() -> bool {
    true
}

/// Composed context plus provenance metadata.
///
/// Advisory content lives in its own field, never concatenated into
/// `internal_context`, so a downstream prompt composer cannot let it
/// influence a score.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ContextBundle {
    /// Internal governance/document or organizational context
    pub internal_context: String,
    /// Clearly labeled ADVISORY ONLY block, when present
    pub advisory_context: Option<String>,
    pub metadata: ContextMetadata,
}

/// Provenance metadata returned alongside any generated content
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContextMetadata {
    pub source_type: SourceType,
    pub knowledge_tier: KnowledgeTier,
    pub has_document_context: bool,
    pub document_context_length: usize,
    /// One or more retrieval sub-queries failed; context is reduced
    pub retrieval_degraded: bool,
    /// Secure-tier request found zero relevant internal documents
    pub insufficient_internal_context: bool,
    /// Context retrieval failed entirely; response should be treated cautiously
    pub low_confidence: bool,
}

impl Default for ContextMetadata {
    fn default() -> Self {
        Self {
            source_type: SourceType::External,
            knowledge_tier: KnowledgeTier::General,
            has_document_context: false,
            document_context_length: 0,
            retrieval_degraded: false,
            insufficient_internal_context: false,
            low_confidence: false,
        }
    }
}
