//! REST API endpoints for AI context routing and content generation

use actix_web::{post, web, HttpResponse};

use crate::api::error::ApiError;
use crate::model::{ContextBundle, ContextRequest};
use crate::service::cache::generation_fingerprint;
use crate::service::generation::GenerationOutcome;
use crate::service::{ContextCache, ContextRouter, GenerationService};

/// Classify a request and compose its context bundle.
///
/// Returns the bundle plus provenance metadata; retrieval degradation is
/// reported in the metadata, never as an HTTP failure.
#[utoipa::path(
    post,
    path = "/v1/ai/context",
    request_body = ContextRequest,
    responses(
        (status = 200, description = "Context bundle composed", body = ContextBundle)
    ),
    tag = "ai"
)]
#[post("/v1/ai/context")]
pub async fn compose_context(
    router: web::Data<ContextRouter>,
    body: web::Json<ContextRequest>,
) -> HttpResponse {
    let request = body.into_inner();
    let bundle = router.route(&request).await;
    HttpResponse::Ok().json(bundle)
}

/// Route a request and generate maturity content drafts from its context.
///
/// The response carries the provenance metadata the UI renders as the
/// "AI Knowledge Sources" indicator.
#[utoipa::path(
    post,
    path = "/v1/ai/generate",
    request_body = ContextRequest,
    responses(
        (status = 200, description = "Content generated"),
        (status = 502, description = "Language model unavailable")
    ),
    tag = "ai"
)]
#[post("/v1/ai/generate")]
pub async fn generate_content(
    router: web::Data<ContextRouter>,
    generation: web::Data<GenerationService>,
    cache: web::Data<Option<ContextCache>>,
    body: web::Json<ContextRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    let fingerprint = generation_fingerprint(&request);

    if let Some(cache) = cache.as_ref() {
        if let Ok(cached) = cache.get_generation::<GenerationOutcome>(&fingerprint).await {
            tracing::debug!(fingerprint = %fingerprint, "Serving cached generation outcome");
            return Ok(HttpResponse::Ok().json(cached));
        }
    }

    let bundle = router.route(&request).await;
    let outcome = generation.generate(&request, &bundle).await?;

    if let Some(cache) = cache.as_ref() {
        if let Err(e) = cache.set_generation(&fingerprint, &outcome).await {
            tracing::warn!(error = %e, "Failed to cache generation outcome");
        }
    }

    Ok(HttpResponse::Ok().json(outcome))
}

/// Configure AI routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(compose_context).service(generate_content);
}
