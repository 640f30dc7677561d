//! Knowledge tier classification for AI requests
//!
//! An ordered rule list over keyword sets: the first matching rule decides
//! the tier. Domain-scoped requests always land in the secure tier.

use crate::model::{ContextRequest, KnowledgeTier};

/// Terms tied to governance/audit operations: content generation,
/// compliance scoring, roadmap and audit structure
const INTERNAL_SECURE_TERMS: &[&str] = &[
    "generate",
    "practice statement",
    "mps",
    "intent",
    "criteria",
    "criterion",
    "maturity level",
    "scoring",
    "score",
    "compliance",
    "compliant",
    "assessment",
    "audit",
    "roadmap",
    "gap analysis",
    "governance",
    "framework",
    "evidence",
];

/// Terms indicating threat/risk situational awareness
const EXTERNAL_AWARENESS_TERMS: &[&str] = &[
    "threat",
    "risk landscape",
    "attack",
    "breach",
    "ransomware",
    "phishing",
    "vulnerability",
    "incident trend",
    "situational awareness",
    "threat intelligence",
    "emerging risk",
    "advisory",
];

/// Terms about organization structure and metadata
const ORGANIZATIONAL_TERMS: &[&str] = &[
    "org size",
    "organization size",
    "headcount",
    "employees",
    "department",
    "team structure",
    "role",
    "reporting line",
    "onboarding",
    "org chart",
    "business unit",
];

/// One classification rule: keyword set and the tier it selects
struct TierRule {
    terms: &'static [&'static str],
    tier: KnowledgeTier,
}

/// Rules in priority order; first match wins
const TIER_RULES: &[TierRule] = &[
    TierRule {
        terms: INTERNAL_SECURE_TERMS,
        tier: KnowledgeTier::InternalSecure,
    },
    TierRule {
        terms: EXTERNAL_AWARENESS_TERMS,
        tier: KnowledgeTier::ExternalAwareness,
    },
    TierRule {
        terms: ORGANIZATIONAL_TERMS,
        tier: KnowledgeTier::OrganizationalContext,
    },
];

/// Classify a request into exactly one knowledge tier
pub fn classify(request: &ContextRequest) -> KnowledgeTier {
    // Domain-scoped requests default to the secure tier regardless of wording
    if request.current_domain.is_some() {
        tracing::debug!(
            domain = request.current_domain.as_deref(),
            "Domain-scoped request, classified as internal secure"
        );
        return KnowledgeTier::InternalSecure;
    }

    let haystack = format!(
        "{} {}",
        request.prompt_text.to_lowercase(),
        request.free_text_context.to_lowercase()
    );

    for rule in TIER_RULES {
        if let Some(term) = rule.terms.iter().find(|term| haystack.contains(*term)) {
            tracing::debug!(term = term, tier = ?rule.tier, "Classified request by keyword");
            return rule.tier;
        }
    }

    tracing::debug!("No tier keywords matched, defaulting to general tier");
    KnowledgeTier::General
}
