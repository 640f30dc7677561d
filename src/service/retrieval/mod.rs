//! Knowledge tiering and retrieval router
//!
//! Classifies an AI request into a knowledge tier, gathers tier-appropriate
//! context from the search/insight/profile collaborators, and composes a
//! context bundle with provenance metadata. Retrieval failures degrade the
//! bundle; they never block the request.

pub mod external;
pub mod internal;

use std::sync::Arc;

use crate::model::{
    ContextBundle, ContextMetadata, ContextRequest, KnowledgeTier, OrganizationProfile,
    RetrievalConfig,
};
use crate::service::classifier;
use crate::service::insights::InsightStore;
use crate::service::profiles::OrganizationStore;
use crate::service::search::DocumentSearch;

/// Router composing tier-appropriate context ahead of any LLM call
pub struct ContextRouter {
    search: Arc<dyn DocumentSearch>,
    insights: Arc<dyn InsightStore>,
    profiles: Arc<dyn OrganizationStore>,
    config: RetrievalConfig,
}

impl ContextRouter {
    pub fn new(
        search: Arc<dyn DocumentSearch>,
        insights: Arc<dyn InsightStore>,
        profiles: Arc<dyn OrganizationStore>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            search,
            insights,
            profiles,
            config,
        }
    }

    /// Classify the request and assemble its context bundle.
    ///
    /// Infallible by design: every failure mode is folded into the bundle's
    /// metadata so the downstream LLM call can still proceed.
    pub async fn route(&self, request: &ContextRequest) -> ContextBundle {
        let tier = classifier::classify(request);

        let (profile, profile_failed) = self.load_profile(&request.organization_id).await;

        let mut bundle = match tier {
            KnowledgeTier::InternalSecure => {
                self.route_internal_secure(request, profile.as_ref()).await
            }
            KnowledgeTier::ExternalAwareness => {
                self.route_external_awareness(request, profile.as_ref()).await
            }
            KnowledgeTier::OrganizationalContext => {
                Self::route_organizational(profile.as_ref())
            }
            KnowledgeTier::General => ContextBundle::default(),
        };

        bundle.metadata.knowledge_tier = tier;
        bundle.metadata.source_type = tier.source_type();
        if profile_failed {
            bundle.metadata.retrieval_degraded = true;
        }
        // Nothing at all could be gathered for a tier that wanted context
        if tier != KnowledgeTier::General
            && bundle.internal_context.is_empty()
            && bundle.advisory_context.is_none()
            && (bundle.metadata.retrieval_degraded || profile_failed)
        {
            bundle.metadata.low_confidence = true;
        }

        tracing::info!(
            organization = %request.organization_id,
            tier = ?tier,
            has_document_context = bundle.metadata.has_document_context,
            degraded = bundle.metadata.retrieval_degraded,
            low_confidence = bundle.metadata.low_confidence,
            "Composed context bundle"
        );

        bundle
    }

    async fn load_profile(
        &self,
        organization_id: &str,
    ) -> (Option<OrganizationProfile>, bool) {
        match self.profiles.get_profile(organization_id).await {
            Ok(profile) => (profile, false),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    organization = %organization_id,
                    "Profile fetch failed, continuing without profile"
                );
                (None, true)
            }
        }
    }

    async fn route_internal_secure(
        &self,
        request: &ContextRequest,
        profile: Option<&OrganizationProfile>,
    ) -> ContextBundle {
        let gathered = internal::gather(&self.search, request, profile, &self.config).await;

        ContextBundle {
            internal_context: gathered.text,
            advisory_context: None,
            metadata: ContextMetadata {
                has_document_context: gathered.has_document_context,
                document_context_length: gathered.document_context_length,
                retrieval_degraded: gathered.degraded,
                insufficient_internal_context: gathered.insufficient,
                ..ContextMetadata::default()
            },
        }
    }

    async fn route_external_awareness(
        &self,
        request: &ContextRequest,
        profile: Option<&OrganizationProfile>,
    ) -> ContextBundle {
        let Some(profile) = profile else {
            tracing::debug!(
                organization = %request.organization_id,
                "No organization profile, skipping external awareness"
            );
            return ContextBundle::default();
        };

        let gathered = external::gather(
            &self.insights,
            profile,
            request.allow_external_context,
            &self.config,
        )
        .await;

        ContextBundle {
            internal_context: String::new(),
            advisory_context: gathered.text,
            metadata: ContextMetadata {
                retrieval_degraded: gathered.degraded,
                ..ContextMetadata::default()
            },
        }
    }

    fn route_organizational(profile: Option<&OrganizationProfile>) -> ContextBundle {
        let Some(profile) = profile else {
            return ContextBundle::default();
        };

        let text = compose_profile(profile);
        ContextBundle {
            internal_context: text,
            advisory_context: None,
            metadata: ContextMetadata::default(),
        }
    }
}

/// Compose organization profile fields as direct context (no retrieval)
fn compose_profile(profile: &OrganizationProfile) -> String {
    let mut text = format!("## Organization Profile\n\nName: {}\n", profile.name);

    if !profile.industry_tags.is_empty() {
        text.push_str(&format!("Industry: {}\n", profile.industry_tags.join(", ")));
    }
    if let Some(region) = &profile.operating_region {
        text.push_str(&format!("Operating region: {}\n", region));
    }
    if let Some(size) = &profile.size_band {
        text.push_str(&format!("Size: {}\n", size));
    }
    if let Some(summary) = &profile.structure_summary {
        text.push_str(&format!("Structure: {}\n", summary));
    }

    text.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;

    use crate::model::{ExternalInsight, RankedChunk, SourceType, ThreatSensitivity};
    use crate::service::insights::InsightError;
    use crate::service::profiles::ProfileError;
    use crate::service::search::SearchError;

    struct StubSearch {
        results: Vec<RankedChunk>,
        fail: bool,
    }

    #[async_trait]
    impl DocumentSearch for StubSearch {
        async fn search(
            &self,
            _query: &str,
            _organization_id: &str,
            _limit: usize,
            _threshold: f64,
        ) -> Result<Vec<RankedChunk>, SearchError> {
            if self.fail {
                return Err(SearchError::Db(crate::db::DbError::NotFound(
                    "unavailable".to_string(),
                )));
            }
            Ok(self.results.clone())
        }
    }

    struct StubInsights {
        records: Vec<ExternalInsight>,
    }

    #[async_trait]
    impl InsightStore for StubInsights {
        async fn recent_verified(
            &self,
            _window_days: i64,
        ) -> Result<Vec<ExternalInsight>, InsightError> {
            Ok(self.records.clone())
        }
    }

    struct StubProfiles {
        profile: Option<OrganizationProfile>,
    }

    #[async_trait]
    impl OrganizationStore for StubProfiles {
        async fn get_profile(
            &self,
            _organization_id: &str,
        ) -> Result<Option<OrganizationProfile>, ProfileError> {
            Ok(self.profile.clone())
        }
    }

    fn profile(sensitivity: ThreatSensitivity) -> OrganizationProfile {
        OrganizationProfile {
            organization_id: "org-1".to_string(),
            name: "Acme".to_string(),
            industry_tags: vec!["finance".to_string()],
            operating_region: Some("EMEA".to_string()),
            size_band: Some("200-500".to_string()),
            structure_summary: None,
            risk_concerns: vec!["ransomware".to_string()],
            threat_sensitivity: sensitivity,
            ai_governance_policy: Some("Use approved sources only.".to_string()),
        }
    }

    fn ranked(id: &str, similarity: f64) -> RankedChunk {
        RankedChunk {
            chunk_id: id.to_string(),
            source_document_id: format!("doc-{}", id),
            content: format!("content {}", id),
            similarity,
        }
    }

    fn insight(tags: &[&str]) -> ExternalInsight {
        ExternalInsight {
            id: "ins-1".to_string(),
            title: "Sector advisory".to_string(),
            summary: "Increase in targeted phishing".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            verified: true,
            published_at: Utc::now(),
        }
    }

    fn router(
        search: StubSearch,
        insights: StubInsights,
        profiles: StubProfiles,
    ) -> ContextRouter {
        ContextRouter::new(
            Arc::new(search),
            Arc::new(insights),
            Arc::new(profiles),
            RetrievalConfig::default(),
        )
    }

    fn request(prompt: &str) -> ContextRequest {
        ContextRequest {
            organization_id: "org-1".to_string(),
            prompt_text: prompt.to_string(),
            free_text_context: String::new(),
            current_domain: None,
            allow_external_context: true,
        }
    }

    #[tokio::test]
    async fn test_internal_secure_attaches_policy_and_chunks() {
        let r = router(
            StubSearch {
                results: vec![ranked("a", 0.9)],
                fail: false,
            },
            StubInsights { records: vec![] },
            StubProfiles {
                profile: Some(profile(ThreatSensitivity::Standard)),
            },
        );

        let bundle = r.route(&request("generate criteria for domain X")).await;

        assert_eq!(bundle.metadata.knowledge_tier, KnowledgeTier::InternalSecure);
        assert_eq!(bundle.metadata.source_type, SourceType::Internal);
        assert!(bundle.internal_context.contains("AI Governance Policy"));
        assert!(bundle.internal_context.contains("content a"));
        assert!(bundle.metadata.has_document_context);
        assert!(bundle.metadata.document_context_length > 0);
        assert!(bundle.advisory_context.is_none());
        assert!(!bundle.metadata.insufficient_internal_context);
    }

    #[tokio::test]
    async fn test_same_chunk_across_subqueries_appears_once() {
        // A domain-scoped request issues several sub-queries; the stub returns
        // the same chunk for each, so the merged context must contain it once.
        let r = router(
            StubSearch {
                results: vec![ranked("shared", 0.9)],
                fail: false,
            },
            StubInsights { records: vec![] },
            StubProfiles {
                profile: Some(profile(ThreatSensitivity::Standard)),
            },
        );

        let mut req = request("generate criteria");
        req.current_domain = Some("Incident Response".to_string());
        let bundle = r.route(&req).await;

        assert_eq!(bundle.internal_context.matches("content shared").count(), 1);
    }

    #[tokio::test]
    async fn test_zero_chunks_flags_insufficient_context() {
        let r = router(
            StubSearch {
                results: vec![],
                fail: false,
            },
            StubInsights { records: vec![] },
            StubProfiles {
                profile: Some(profile(ThreatSensitivity::Standard)),
            },
        );

        let bundle = r.route(&request("score our compliance posture")).await;

        assert!(bundle.metadata.insufficient_internal_context);
        // Policy alone is still attached; the request proceeds
        assert!(bundle.internal_context.contains("AI Governance Policy"));
    }

    #[tokio::test]
    async fn test_failed_subqueries_degrade_without_blocking() {
        let r = router(
            StubSearch {
                results: vec![],
                fail: true,
            },
            StubInsights { records: vec![] },
            StubProfiles { profile: None },
        );

        let bundle = r.route(&request("generate criteria for domain X")).await;

        assert!(bundle.metadata.retrieval_degraded);
        assert!(bundle.metadata.low_confidence);
        assert!(bundle.internal_context.is_empty());
    }

    #[tokio::test]
    async fn test_basic_threat_sensitivity_skips_advisory() {
        let r = router(
            StubSearch {
                results: vec![],
                fail: false,
            },
            StubInsights {
                records: vec![insight(&["finance"])],
            },
            StubProfiles {
                profile: Some(profile(ThreatSensitivity::Basic)),
            },
        );

        let bundle = r
            .route(&request("what threat trends affect our industry"))
            .await;

        assert_eq!(
            bundle.metadata.knowledge_tier,
            KnowledgeTier::ExternalAwareness
        );
        assert!(bundle.advisory_context.is_none());
    }

    #[tokio::test]
    async fn test_advisory_block_is_separate_and_labeled() {
        let r = router(
            StubSearch {
                results: vec![],
                fail: false,
            },
            StubInsights {
                records: vec![insight(&["finance"])],
            },
            StubProfiles {
                profile: Some(profile(ThreatSensitivity::Elevated)),
            },
        );

        let bundle = r
            .route(&request("what threat trends affect our industry"))
            .await;

        let advisory = bundle.advisory_context.expect("advisory block expected");
        assert!(advisory.starts_with(external::ADVISORY_HEADER));
        assert!(advisory.contains("Sector advisory"));
        // Advisory never bleeds into internal context
        assert!(bundle.internal_context.is_empty());
        assert_eq!(bundle.metadata.source_type, SourceType::External);
    }

    #[tokio::test]
    async fn test_irrelevant_insights_filtered_by_tags() {
        let r = router(
            StubSearch {
                results: vec![],
                fail: false,
            },
            StubInsights {
                records: vec![insight(&["healthcare"])],
            },
            StubProfiles {
                profile: Some(profile(ThreatSensitivity::Elevated)),
            },
        );

        let bundle = r
            .route(&request("what threat trends affect our industry"))
            .await;

        assert!(bundle.advisory_context.is_none());
    }

    #[tokio::test]
    async fn test_organizational_tier_attaches_profile_fields() {
        let r = router(
            StubSearch {
                results: vec![],
                fail: false,
            },
            StubInsights { records: vec![] },
            StubProfiles {
                profile: Some(profile(ThreatSensitivity::Standard)),
            },
        );

        let bundle = r
            .route(&request("summarize our department team structure"))
            .await;

        assert_eq!(
            bundle.metadata.knowledge_tier,
            KnowledgeTier::OrganizationalContext
        );
        assert!(bundle.internal_context.contains("Acme"));
        assert!(bundle.internal_context.contains("finance"));
        assert!(!bundle.metadata.has_document_context);
    }

    #[tokio::test]
    async fn test_general_tier_attaches_nothing() {
        let r = router(
            StubSearch {
                results: vec![ranked("a", 0.9)],
                fail: false,
            },
            StubInsights {
                records: vec![insight(&["finance"])],
            },
            StubProfiles {
                profile: Some(profile(ThreatSensitivity::Elevated)),
            },
        );

        let bundle = r.route(&request("tell me a story about a lighthouse")).await;

        assert_eq!(bundle.metadata.knowledge_tier, KnowledgeTier::General);
        assert!(bundle.internal_context.is_empty());
        assert!(bundle.advisory_context.is_none());
    }

    #[tokio::test]
    async fn test_disallowed_external_context_skips_advisory() {
        let r = router(
            StubSearch {
                results: vec![],
                fail: false,
            },
            StubInsights {
                records: vec![insight(&["finance"])],
            },
            StubProfiles {
                profile: Some(profile(ThreatSensitivity::Elevated)),
            },
        );

        let mut req = request("what threat trends affect our industry");
        req.allow_external_context = false;
        let bundle = r.route(&req).await;

        assert!(bundle.advisory_context.is_none());
    }
}
