//! Health check endpoints for liveness and readiness probes

use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::service::ContextCache;

/// Health status of an individual dependency
#[derive(Debug, Serialize, ToSchema)]
pub struct DependencyHealth {
    pub name: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Aggregate health response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub dependencies: Vec<DependencyHealth>,
}

/// Liveness probe: the process is up and serving requests
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is live")
    ),
    tag = "health"
)]
#[get("/health/live")]
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "live" }))
}

/// Readiness probe: dependencies are reachable
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "One or more dependencies unavailable", body = HealthResponse)
    ),
    tag = "health"
)]
#[get("/health/ready")]
pub async fn readiness(
    pool: web::Data<PgPool>,
    cache: web::Data<Option<ContextCache>>,
) -> impl Responder {
    let mut dependencies = Vec::new();

    let db_healthy = match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => {
            dependencies.push(DependencyHealth {
                name: "postgres".to_string(),
                healthy: true,
                detail: None,
            });
            true
        }
        Err(e) => {
            dependencies.push(DependencyHealth {
                name: "postgres".to_string(),
                healthy: false,
                detail: Some(e.to_string()),
            });
            false
        }
    };

    // Cache is optional; absence is reported but does not fail readiness
    dependencies.push(DependencyHealth {
        name: "redis".to_string(),
        healthy: cache.is_some(),
        detail: if cache.is_some() {
            None
        } else {
            Some("cache not configured".to_string())
        },
    });

    let response = HealthResponse {
        status: if db_healthy { "ready" } else { "unavailable" }.to_string(),
        dependencies,
    };

    if db_healthy {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(liveness).service(readiness);
}
