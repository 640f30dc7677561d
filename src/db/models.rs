//! Database models for chunks, organization profiles, and external insights

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::model::{DocumentChunk, ExternalInsight, OrganizationProfile, ThreatSensitivity};

/// Database representation of a document chunk
#[derive(Debug, Clone, FromRow)]
pub struct DocumentChunkRow {
    pub id: String,
    pub document_id: String,
    pub organization_id: String,
    pub content: String,
    /// JSON array of floats, NULL until the embedding worker processes the chunk
    pub embedding: Option<serde_json::Value>,
    pub ingested_at: DateTime<Utc>,
}

impl DocumentChunkRow {
    /// Convert database row to domain model
    pub fn into_domain(self) -> Result<DocumentChunk, String> {
        let embedding = match self.embedding {
            Some(value) => Some(
                serde_json::from_value::<Vec<f64>>(value)
                    .map_err(|e| format!("Invalid embedding payload: {}", e))?,
            ),
            None => None,
        };

        Ok(DocumentChunk {
            id: self.id,
            document_id: self.document_id,
            organization_id: self.organization_id,
            content: self.content,
            embedding,
            ingested_at: self.ingested_at,
        })
    }
}

/// Database representation of an organization profile
#[derive(Debug, Clone, FromRow)]
pub struct OrganizationProfileRow {
    pub organization_id: String,
    pub name: String,
    pub industry_tags: serde_json::Value,
    pub operating_region: Option<String>,
    pub size_band: Option<String>,
    pub structure_summary: Option<String>,
    pub risk_concerns: serde_json::Value,
    pub threat_sensitivity: String,
    pub ai_governance_policy: Option<String>,
}

impl OrganizationProfileRow {
    /// Convert database row to domain model
    pub fn into_domain(self) -> OrganizationProfile {
        let threat_sensitivity = threat_sensitivity_from_string(&self.threat_sensitivity);

        OrganizationProfile {
            organization_id: self.organization_id,
            name: self.name,
            industry_tags: serde_json::from_value(self.industry_tags).unwrap_or_default(),
            operating_region: self.operating_region,
            size_band: self.size_band,
            structure_summary: self.structure_summary,
            risk_concerns: serde_json::from_value(self.risk_concerns).unwrap_or_default(),
            threat_sensitivity,
            ai_governance_policy: self.ai_governance_policy,
        }
    }
}

/// Database representation of an external insight record
#[derive(Debug, Clone, FromRow)]
pub struct ExternalInsightRow {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub tags: serde_json::Value,
    pub verified: bool,
    pub published_at: DateTime<Utc>,
}

impl ExternalInsightRow {
    /// Convert database row to domain model
    pub fn into_domain(self) -> ExternalInsight {
        ExternalInsight {
            id: self.id,
            title: self.title,
            summary: self.summary,
            tags: serde_json::from_value(self.tags).unwrap_or_default(),
            verified: self.verified,
            published_at: self.published_at,
        }
    }
}

/// Helper to convert ThreatSensitivity to string for database storage
pub fn threat_sensitivity_to_string(sensitivity: &ThreatSensitivity) -> &'static str {
    match sensitivity {
        ThreatSensitivity::Basic => "basic",
        ThreatSensitivity::Standard => "standard",
        ThreatSensitivity::Elevated => "elevated",
    }
}

/// Helper to parse ThreatSensitivity from database storage
pub fn threat_sensitivity_from_string(value: &str) -> ThreatSensitivity {
    match value {
        "standard" => ThreatSensitivity::Standard,
        "elevated" => ThreatSensitivity::Elevated,
        _ => ThreatSensitivity::Basic,
    }
}

/// Query parameters for listing document chunks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListChunksQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub organization_id: Option<String>,
    pub document_id: Option<String>,
}

/// Paginated response for document chunks
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedChunks {
    pub chunks: Vec<DocumentChunk>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: u32,
}
