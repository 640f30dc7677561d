//! REST API endpoint for external insight records

use actix_web::{post, web, HttpResponse};

use crate::api::error::ApiError;
use crate::db::repository::InsightRepository;
use crate::model::ExternalInsight;

/// Create or update an external insight record
#[utoipa::path(
    post,
    path = "/v1/insights",
    request_body = ExternalInsight,
    responses(
        (status = 201, description = "Insight stored", body = ExternalInsight),
        (status = 400, description = "Invalid insight"),
        (status = 500, description = "Internal server error")
    ),
    tag = "insights"
)]
#[post("/v1/insights")]
pub async fn upsert_insight(
    repository: web::Data<InsightRepository>,
    body: web::Json<ExternalInsight>,
) -> Result<HttpResponse, ApiError> {
    let insight = body.into_inner();

    if insight.id.trim().is_empty() || insight.title.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Insight id and title must not be empty".to_string(),
        ));
    }

    repository.upsert(&insight).await?;

    Ok(HttpResponse::Created().json(insight))
}

/// Configure insight routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(upsert_insight);
}
