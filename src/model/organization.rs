//! Organization profiles, risk attributes, and external insight records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How aggressively external threat awareness is surfaced for an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ThreatSensitivity {
    /// External awareness retrieval is skipped entirely
    Basic,
    Standard,
    Elevated,
}

/// Organization profile backing the organizational and external-awareness tiers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrganizationProfile {
    pub organization_id: String,
    pub name: String,
    /// Industry tags, e.g. "finance", "healthcare"
    pub industry_tags: Vec<String>,
    pub operating_region: Option<String>,
    /// Headcount band, e.g. "50-200"
    pub size_band: Option<String>,
    /// Free-text summary of departments and key roles
    pub structure_summary: Option<String>,
    /// Declared risk concerns, e.g. "ransomware", "supply chain"
    pub risk_concerns: Vec<String>,
    pub threat_sensitivity: ThreatSensitivity,
    /// Organization AI governance policy text, when one has been uploaded
    pub ai_governance_policy: Option<String>,
}

impl OrganizationProfile {
    /// Tags an external insight may match against for this organization
    pub fn awareness_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .industry_tags
            .iter()
            .chain(self.risk_concerns.iter())
            .map(|t| t.to_lowercase())
            .collect();
        if let Some(region) = &self.operating_region {
            tags.push(region.to_lowercase());
        }
        tags
    }
}

/// A verified external threat-intelligence record.
///
/// Advisory-only by design: insight content must never influence a
/// maturity score.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExternalInsight {
    pub id: String,
    pub title: String,
    pub summary: String,
    /// Industry/region/threat tags, or "Global" for universally relevant records
    pub tags: Vec<String>,
    pub verified: bool,
    pub published_at: DateTime<Utc>,
}

impl ExternalInsight {
    /// Whether this insight is relevant to the given organization tags.
    /// Records tagged "Global" always match.
    pub fn matches_tags(&self, org_tags: &[String]) -> bool {
        self.tags.iter().any(|tag| {
            let tag = tag.to_lowercase();
            tag == "global" || org_tags.iter().any(|ot| ot == &tag)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insight(tags: &[&str]) -> ExternalInsight {
        ExternalInsight {
            id: "ins-1".to_string(),
            title: "Test".to_string(),
            summary: "Test insight".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            verified: true,
            published_at: Utc::now(),
        }
    }

    #[test]
    fn test_global_always_matches() {
        assert!(insight(&["Global"]).matches_tags(&[]));
        assert!(insight(&["Global"]).matches_tags(&["finance".to_string()]));
    }

    #[test]
    fn test_tag_intersection() {
        let org_tags = vec!["finance".to_string(), "ransomware".to_string()];
        assert!(insight(&["Finance"]).matches_tags(&org_tags));
        assert!(insight(&["ransomware", "emea"]).matches_tags(&org_tags));
        assert!(!insight(&["healthcare"]).matches_tags(&org_tags));
    }
}
