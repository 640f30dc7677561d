//! REST API endpoints for document ingestion and chunk management

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::error::ApiError;
use crate::db::models::ListChunksQuery;
use crate::db::repository::ChunkRepository;
use crate::service::IngestService;

/// Request body for ingesting a document
#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestDocumentRequest {
    pub organization_id: String,
    pub document_id: String,
    /// Full document text; chunked and queued for embedding on ingest
    pub text: String,
}

/// Response for a successful ingestion
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestDocumentResponse {
    pub document_id: String,
    pub chunk_ids: Vec<String>,
}

/// Query parameters for listing chunks
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListChunksParams {
    /// Page number (1-indexed, default: 1)
    pub page: Option<u32>,
    /// Page size (default: 20, max: 100)
    pub page_size: Option<u32>,
    /// Filter by organization
    pub organization_id: Option<String>,
    /// Filter by source document
    pub document_id: Option<String>,
}

/// Summary of a chunk for list responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ChunkSummary {
    pub id: String,
    pub document_id: String,
    pub organization_id: String,
    pub embedded: bool,
    pub ingested_at: String,
}

/// Paginated response for chunks
#[derive(Debug, Serialize, ToSchema)]
pub struct ChunkListResponse {
    pub chunks: Vec<ChunkSummary>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

/// Ingest a document as organization-scoped chunks
#[utoipa::path(
    post,
    path = "/v1/documents",
    request_body = IngestDocumentRequest,
    responses(
        (status = 201, description = "Document ingested", body = IngestDocumentResponse),
        (status = 400, description = "Empty document text"),
        (status = 500, description = "Internal server error")
    ),
    tag = "documents"
)]
#[post("/v1/documents")]
pub async fn ingest_document(
    service: web::Data<IngestService>,
    body: web::Json<IngestDocumentRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Document text must not be empty".to_string(),
        ));
    }

    let chunk_ids = service
        .ingest_document(&request.organization_id, &request.document_id, &request.text)
        .await?;

    Ok(HttpResponse::Created().json(IngestDocumentResponse {
        document_id: request.document_id,
        chunk_ids,
    }))
}

/// List document chunks with pagination and filters
#[utoipa::path(
    get,
    path = "/v1/documents",
    params(ListChunksParams),
    responses(
        (status = 200, description = "Chunks retrieved successfully", body = ChunkListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "documents"
)]
#[get("/v1/documents")]
pub async fn list_chunks(
    repository: web::Data<ChunkRepository>,
    query: web::Query<ListChunksParams>,
) -> Result<HttpResponse, ApiError> {
    let db_query = ListChunksQuery {
        page: query.page,
        page_size: query.page_size,
        organization_id: query.organization_id.clone(),
        document_id: query.document_id.clone(),
    };

    let paginated = repository.list(db_query).await?;

    let summaries: Vec<ChunkSummary> = paginated
        .chunks
        .into_iter()
        .map(|chunk| ChunkSummary {
            id: chunk.id,
            document_id: chunk.document_id,
            organization_id: chunk.organization_id,
            embedded: chunk.embedding.is_some(),
            ingested_at: chunk.ingested_at.to_rfc3339(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(ChunkListResponse {
        chunks: summaries,
        page: paginated.page,
        page_size: paginated.page_size,
        total_count: paginated.total_count,
        total_pages: paginated.total_pages,
    }))
}

/// Get a document chunk by ID
#[utoipa::path(
    get,
    path = "/v1/documents/{id}",
    params(
        ("id" = String, Path, description = "Chunk ID (content hash)")
    ),
    responses(
        (status = 200, description = "Chunk retrieved successfully", body = crate::model::DocumentChunk),
        (status = 404, description = "Chunk not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "documents"
)]
#[get("/v1/documents/{id}")]
pub async fn get_chunk(
    repository: web::Data<ChunkRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let chunk = repository.get_by_id(&id).await.map_err(|e| match e {
        crate::db::DbError::NotFound(_) => ApiError::ChunkNotFound(id.clone()),
        other => ApiError::from(other),
    })?;

    Ok(HttpResponse::Ok().json(chunk))
}

/// Delete a document chunk by ID
#[utoipa::path(
    delete,
    path = "/v1/documents/{id}",
    params(
        ("id" = String, Path, description = "Chunk ID (content hash)")
    ),
    responses(
        (status = 204, description = "Chunk deleted successfully"),
        (status = 404, description = "Chunk not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "documents"
)]
#[delete("/v1/documents/{id}")]
pub async fn delete_chunk(
    repository: web::Data<ChunkRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    if !repository.delete(&id).await? {
        return Err(ApiError::ChunkNotFound(id));
    }

    tracing::info!(id = %id, "Chunk deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Configure document routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(ingest_document)
        .service(list_chunks)
        .service(get_chunk)
        .service(delete_chunk);
}
