pub mod config;
pub mod context;
pub mod document;
pub mod generation;
pub mod maturity;
pub mod organization;

pub use config::{Config, RetrievalConfig};
pub use context::{ContextBundle, ContextMetadata, ContextRequest, KnowledgeTier, SourceType};
pub use document::{DocumentChunk, RankedChunk};
pub use maturity::{CriteriaScore, DomainScore, MaturityLevel};
pub use organization::{ExternalInsight, OrganizationProfile, ThreatSensitivity};
