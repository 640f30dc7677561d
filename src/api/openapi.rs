//! OpenAPI documentation

use actix_web::{get, web, HttpResponse, Responder};
use utoipa::OpenApi;

use crate::api;
use crate::model::{
    ContextBundle, ContextMetadata, ContextRequest, CriteriaScore, DocumentChunk, DomainScore,
    ExternalInsight, KnowledgeTier, MaturityLevel, OrganizationProfile, RankedChunk, SourceType,
    ThreatSensitivity,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Maturity Intel API",
        version = "0.1.0",
        description = "Organizational maturity scoring and tiered AI context retrieval service",
        license(name = "Apache-2.0")
    ),
    paths(
        api::scoring::score_assessment,
        api::context::compose_context,
        api::context::generate_content,
        api::document::ingest_document,
        api::document::list_chunks,
        api::document::get_chunk,
        api::document::delete_chunk,
        api::organization::upsert_profile,
        api::organization::get_profile,
        api::insight::upsert_insight,
        api::health::liveness,
        api::health::readiness,
    ),
    components(schemas(
        MaturityLevel,
        CriteriaScore,
        DomainScore,
        KnowledgeTier,
        SourceType,
        ContextRequest,
        ContextBundle,
        ContextMetadata,
        DocumentChunk,
        RankedChunk,
        OrganizationProfile,
        ExternalInsight,
        ThreatSensitivity,
        api::scoring::DomainScoreRequest,
        api::scoring::ScoreAssessmentRequest,
        api::document::IngestDocumentRequest,
        api::document::IngestDocumentResponse,
        api::document::ChunkSummary,
        api::document::ChunkListResponse,
        api::organization::UpsertProfileRequest,
        api::health::DependencyHealth,
        api::health::HealthResponse,
    )),
    tags(
        (name = "scoring", description = "Maturity assessment scoring"),
        (name = "ai", description = "Context routing and content generation"),
        (name = "documents", description = "Document ingestion and chunk management"),
        (name = "organizations", description = "Organization profile management"),
        (name = "insights", description = "External insight records"),
        (name = "health", description = "Health checks")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI specification as JSON
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve the OpenAPI specification as YAML
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> impl Responder {
    match ApiDoc::openapi().to_yaml() {
        Ok(yaml) => HttpResponse::Ok()
            .content_type("application/yaml")
            .body(yaml),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize OpenAPI spec");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
