//! REST API endpoints for maturity assessment scoring

use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::model::{CriteriaScore, DomainScore, MaturityLevel};
use crate::service::scoring;

/// One domain's criteria to score
#[derive(Debug, Deserialize, ToSchema)]
pub struct DomainScoreRequest {
    pub domain_id: String,
    pub domain_name: String,
    pub target_level: MaturityLevel,
    pub criteria_scores: Vec<CriteriaScore>,
}

/// Request body for scoring one or more domains
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScoreAssessmentRequest {
    pub domains: Vec<DomainScoreRequest>,
}

/// Score an assessment's domains.
///
/// Pure computation: validation failures return 400 with the offending
/// criterion, never a partially computed result.
#[utoipa::path(
    post,
    path = "/v1/assessments/score",
    request_body = ScoreAssessmentRequest,
    responses(
        (status = 200, description = "Domain scores computed", body = [DomainScore]),
        (status = 400, description = "Invalid scoring input")
    ),
    tag = "scoring"
)]
#[post("/v1/assessments/score")]
pub async fn score_assessment(
    body: web::Json<ScoreAssessmentRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    if request.domains.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one domain is required".to_string(),
        ));
    }

    let domains: Vec<(String, String, Vec<CriteriaScore>, MaturityLevel)> = request
        .domains
        .into_iter()
        .map(|d| (d.domain_id, d.domain_name, d.criteria_scores, d.target_level))
        .collect();

    let scores = scoring::score_assessment(domains)?;

    Ok(HttpResponse::Ok().json(scores))
}

/// Configure scoring routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(score_assessment);
}
