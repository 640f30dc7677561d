//! Advisory-tier context gathering: verified external insights filtered to
//! the organization's risk profile
//!
//! Advisory content is composed into its own labeled block and must never
//! be concatenated with secure-tier context.

use std::sync::Arc;

use crate::model::{ExternalInsight, OrganizationProfile, RetrievalConfig, ThreatSensitivity};
use crate::service::insights::InsightStore;

/// Label separating advisory content from anything scoring-relevant
pub const ADVISORY_HEADER: &str =
    "=== ADVISORY ONLY: EXTERNAL THREAT AWARENESS (must not influence any maturity score) ===";

/// Result of advisory context gathering
#[derive(Debug, Default)]
pub struct AdvisoryContext {
    /// Labeled advisory block, when anything relevant was found
    pub text: Option<String>,
    /// The insight fetch failed; context is reduced
    pub degraded: bool,
}

/// Gather the advisory block for an organization.
///
/// Skipped entirely when external context is disallowed or the
/// organization's threat sensitivity is at its lowest setting.
pub async fn gather(
    insights: &Arc<dyn InsightStore>,
    profile: &OrganizationProfile,
    allow_external_context: bool,
    config: &RetrievalConfig,
) -> AdvisoryContext {
    if !allow_external_context {
        tracing::debug!(
            organization = %profile.organization_id,
            "External context disallowed by request"
        );
        return AdvisoryContext::default();
    }

    if profile.threat_sensitivity == ThreatSensitivity::Basic {
        tracing::debug!(
            organization = %profile.organization_id,
            "Threat sensitivity is basic, skipping external awareness"
        );
        return AdvisoryContext::default();
    }

    let records = match insights.recent_verified(config.insight_window_days).await {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(
                error = %e,
                organization = %profile.organization_id,
                "Insight fetch failed, continuing without advisory context"
            );
            return AdvisoryContext {
                text: None,
                degraded: true,
            };
        }
    };

    let org_tags = profile.awareness_tags();
    let relevant: Vec<&ExternalInsight> = records
        .iter()
        .filter(|insight| insight.matches_tags(&org_tags))
        .collect();

    if relevant.is_empty() {
        tracing::debug!(
            organization = %profile.organization_id,
            fetched = records.len(),
            "No insights matched organization tags"
        );
        return AdvisoryContext::default();
    }

    AdvisoryContext {
        text: Some(compose(&relevant)),
        degraded: false,
    }
}

/// Compose the labeled advisory block
fn compose(insights: &[&ExternalInsight]) -> String {
    let mut text = String::from(ADVISORY_HEADER);
    text.push_str("\n\n");

    for insight in insights {
        text.push_str(&format!(
            "- {} ({})\n  {}\n",
            insight.title,
            insight.published_at.format("%Y-%m-%d"),
            insight.summary
        ));
    }

    text.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn insight(title: &str, tags: &[&str]) -> ExternalInsight {
        ExternalInsight {
            id: title.to_string(),
            title: title.to_string(),
            summary: format!("{} summary", title),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            verified: true,
            published_at: Utc::now(),
        }
    }

    #[test]
    fn test_compose_is_labeled_advisory_only() {
        let a = insight("Ransomware wave", &["finance"]);
        let text = compose(&[&a]);

        assert!(text.starts_with(ADVISORY_HEADER));
        assert!(text.contains("Ransomware wave"));
    }
}
