//! Secure-tier context gathering: governance policy plus semantically
//! ranked, organization-scoped document chunks

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::model::{ContextRequest, OrganizationProfile, RankedChunk, RetrievalConfig};
use crate::service::search::DocumentSearch;

/// Result of internal context gathering
#[derive(Debug, Default)]
pub struct InternalContext {
    pub text: String,
    pub has_document_context: bool,
    pub document_context_length: usize,
    /// At least one sub-query failed or timed out
    pub degraded: bool,
    /// Zero relevant internal documents were found
    pub insufficient: bool,
}

/// Sub-queries for a secure-tier request: the prompt itself plus
/// domain-specific auxiliary queries when a domain is in scope
pub fn build_queries(request: &ContextRequest) -> Vec<String> {
    let mut queries = vec![request.prompt_text.clone()];

    if !request.free_text_context.trim().is_empty() {
        queries.push(request.free_text_context.clone());
    }

    if let Some(domain) = &request.current_domain {
        queries.push(format!("{} maturity practices and standards", domain));
        queries.push(format!("{} policies procedures and controls", domain));
        queries.push(format!("{} assessment evidence", domain));
    }

    queries
}

/// Fan out the sub-queries concurrently, then merge: dedupe by chunk id,
/// sort by descending similarity, cap at the configured maximum.
///
/// A failed or timed-out sub-query is logged and skipped; it never aborts
/// the overall request.
pub async fn gather(
    search: &Arc<dyn DocumentSearch>,
    request: &ContextRequest,
    profile: Option<&OrganizationProfile>,
    config: &RetrievalConfig,
) -> InternalContext {
    let queries = build_queries(request);
    let timeout = Duration::from_millis(config.query_timeout_ms);

    let futures: Vec<_> = queries
        .iter()
        .map(|query| {
            let search = Arc::clone(search);
            let organization_id = request.organization_id.clone();
            let query = query.clone();
            let limit = config.per_query_limit;
            let threshold = config.similarity_threshold;
            async move {
                tokio::time::timeout(
                    timeout,
                    search.search(&query, &organization_id, limit, threshold),
                )
                .await
            }
        })
        .collect();

    let results = join_all(futures).await;

    let mut degraded = false;
    let mut merged: Vec<RankedChunk> = Vec::new();

    for (query, result) in queries.iter().zip(results) {
        match result {
            Ok(Ok(chunks)) => merged.extend(chunks),
            Ok(Err(e)) => {
                degraded = true;
                tracing::warn!(
                    error = %e,
                    query_preview = query.chars().take(60).collect::<String>(),
                    "Retrieval sub-query failed, continuing with reduced context"
                );
            }
            Err(_) => {
                degraded = true;
                tracing::warn!(
                    timeout_ms = config.query_timeout_ms,
                    query_preview = query.chars().take(60).collect::<String>(),
                    "Retrieval sub-query timed out, continuing with reduced context"
                );
            }
        }
    }

    let chunks = merge_ranked(merged, config.max_context_chunks);

    let policy = profile.and_then(|p| p.ai_governance_policy.as_deref());
    let insufficient = chunks.is_empty();
    let text = compose(policy, &chunks);
    let document_context_length: usize = chunks.iter().map(|c| c.content.len()).sum();

    if insufficient {
        tracing::info!(
            organization = %request.organization_id,
            "No internal documentation matched; flagging insufficient context"
        );
    }

    InternalContext {
        text,
        has_document_context: !chunks.is_empty(),
        document_context_length,
        degraded,
        insufficient,
    }
}

/// Dedupe by chunk identity (keeping the highest-similarity occurrence),
/// sort best-first, cap at `max`
pub fn merge_ranked(mut chunks: Vec<RankedChunk>, max: usize) -> Vec<RankedChunk> {
    chunks.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut seen = HashSet::new();
    chunks.retain(|c| seen.insert(c.chunk_id.clone()));
    chunks.truncate(max);
    chunks
}

/// Compose the secure-tier context text
fn compose(policy: Option<&str>, chunks: &[RankedChunk]) -> String {
    let mut text = String::new();

    if let Some(policy) = policy {
        text.push_str("## AI Governance Policy\n\n");
        text.push_str(policy);
        text.push_str("\n\n");
    }

    if !chunks.is_empty() {
        text.push_str("## Internal Documentation\n\n");
        for chunk in chunks {
            text.push_str(&format!(
                "[source: {} | similarity: {:.3}]\n{}\n\n",
                chunk.source_document_id, chunk.similarity, chunk.content
            ));
        }
    }

    text.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(id: &str, similarity: f64) -> RankedChunk {
        RankedChunk {
            chunk_id: id.to_string(),
            source_document_id: format!("doc-{}", id),
            content: format!("content of {}", id),
            similarity,
        }
    }

    #[test]
    fn test_merge_dedupes_by_chunk_id() {
        let chunks = vec![ranked("a", 0.8), ranked("b", 0.9), ranked("a", 0.95)];
        let merged = merge_ranked(chunks, 10);

        assert_eq!(merged.len(), 2);
        // The higher-similarity duplicate wins and sorts first
        assert_eq!(merged[0].chunk_id, "a");
        assert_eq!(merged[0].similarity, 0.95);
        assert_eq!(merged[1].chunk_id, "b");
    }

    #[test]
    fn test_merge_sorts_descending_and_caps() {
        let chunks = vec![
            ranked("a", 0.7),
            ranked("b", 0.95),
            ranked("c", 0.8),
            ranked("d", 0.9),
        ];
        let merged = merge_ranked(chunks, 3);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].chunk_id, "b");
        assert_eq!(merged[1].chunk_id, "d");
        assert_eq!(merged[2].chunk_id, "c");
    }

    #[test]
    fn test_build_queries_includes_domain_auxiliaries() {
        let request = ContextRequest {
            organization_id: "org-1".to_string(),
            prompt_text: "generate criteria".to_string(),
            free_text_context: String::new(),
            current_domain: Some("Incident Response".to_string()),
            allow_external_context: true,
        };
        let queries = build_queries(&request);

        assert_eq!(queries.len(), 4);
        assert!(queries[1].contains("Incident Response"));
    }

    #[test]
    fn test_compose_sections() {
        let text = compose(Some("Policy body"), &[ranked("a", 0.9)]);
        assert!(text.contains("## AI Governance Policy"));
        assert!(text.contains("Policy body"));
        assert!(text.contains("## Internal Documentation"));
        assert!(text.contains("doc-a"));
    }
}
