use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use crate::AppState;
use crate::models::responses::{HealthResponse, ServiceHealth};

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, body = HealthResponse, description = "Service health check")),
    tag = "Health"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = match &state.db {
        Some(db) => {
            let check = db.health_check().await;
            ServiceHealth {
                status: check.status,
                latency_ms: check.latency_ms,
                error: check.error,
            }
        }
        None => ServiceHealth {
            status: "not_configured".to_string(),
            latency_ms: None,
            error: None,
        },
    };

    // Without a database the service still runs on environment secrets.
    let overall_status = if database.status == "down" {
        "unhealthy"
    } else {
        "healthy"
    };

    let mut services = HashMap::new();
    services.insert("database".to_string(), database);

    Json(HealthResponse {
        status: overall_status.to_string(),
        timestamp: Utc::now().naive_utc(),
        services,
    })
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service info")),
    tag = "Health"
)]
pub async fn root(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": state.settings.app_name,
        "version": state.settings.app_version,
        "environment": state.settings.environment,
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "status": "running",
        "docs": "/api-docs/openapi.json",
        "health": "/health",
    }))
}
