//! REST API endpoints for organization profile management

use actix_web::{get, put, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::db::repository::OrganizationRepository;
use crate::model::{OrganizationProfile, ThreatSensitivity};

/// Request body for upserting an organization profile.
/// The organization id comes from the path.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertProfileRequest {
    pub name: String,
    #[serde(default)]
    pub industry_tags: Vec<String>,
    pub operating_region: Option<String>,
    pub size_band: Option<String>,
    pub structure_summary: Option<String>,
    #[serde(default)]
    pub risk_concerns: Vec<String>,
    pub threat_sensitivity: ThreatSensitivity,
    pub ai_governance_policy: Option<String>,
}

/// Create or update an organization profile
#[utoipa::path(
    put,
    path = "/v1/organizations/{id}/profile",
    params(
        ("id" = String, Path, description = "Organization ID")
    ),
    request_body = UpsertProfileRequest,
    responses(
        (status = 200, description = "Profile stored", body = OrganizationProfile),
        (status = 400, description = "Invalid profile"),
        (status = 500, description = "Internal server error")
    ),
    tag = "organizations"
)]
#[put("/v1/organizations/{id}/profile")]
pub async fn upsert_profile(
    repository: web::Data<OrganizationRepository>,
    path: web::Path<String>,
    body: web::Json<UpsertProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    let organization_id = path.into_inner();
    let request = body.into_inner();

    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Organization name must not be empty".to_string(),
        ));
    }

    let profile = OrganizationProfile {
        organization_id,
        name: request.name,
        industry_tags: request.industry_tags,
        operating_region: request.operating_region,
        size_band: request.size_band,
        structure_summary: request.structure_summary,
        risk_concerns: request.risk_concerns,
        threat_sensitivity: request.threat_sensitivity,
        ai_governance_policy: request.ai_governance_policy,
    };

    repository.upsert(&profile).await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Get an organization profile
#[utoipa::path(
    get,
    path = "/v1/organizations/{id}/profile",
    params(
        ("id" = String, Path, description = "Organization ID")
    ),
    responses(
        (status = 200, description = "Profile retrieved", body = OrganizationProfile),
        (status = 404, description = "Profile not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "organizations"
)]
#[get("/v1/organizations/{id}/profile")]
pub async fn get_profile(
    repository: web::Data<OrganizationRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let profile = repository.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Configure organization routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(upsert_profile).service(get_profile);
}
