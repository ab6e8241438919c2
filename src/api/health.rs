use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::time::Instant;

use super::error::ApiError;
use crate::controller::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    host: String,
    processors: usize,
    checks: HealthChecks,
}

/// Individual health checks
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    scratch_dir: ComponentHealth,
}

/// Health status of a component
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ComponentHealth {
    fn healthy(latency_ms: u64) -> Self {
        Self {
            status: "healthy".to_string(),
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy".to_string(),
            latency_ms: None,
            error: Some(error),
        }
    }
}

/// GET /health - Health check endpoint
///
/// Reports host facts and whether the I/O churn loop has somewhere to write.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let scratch_dir = check_scratch_dir(&state).await;
    let all_healthy = scratch_dir.status == "healthy";

    let response = HealthResponse {
        status: if all_healthy {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        timestamp: chrono::Utc::now(),
        host: state.controller.host().to_string(),
        processors: state.controller.processors(),
        checks: HealthChecks { scratch_dir },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

async fn check_scratch_dir(state: &AppState) -> ComponentHealth {
    let start = Instant::now();
    if state.controller.scratch_dir_ready().await {
        ComponentHealth::healthy(start.elapsed().as_millis() as u64)
    } else {
        let path = state.controller.settings().scratch_path.display().to_string();
        ComponentHealth::unhealthy(format!("scratch directory for {path} is missing"))
    }
}

/// GET /health/ready - Readiness check
///
/// Not ready while the I/O churn loop would fail on its first append.
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    if state.controller.scratch_dir_ready().await {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::ServiceUnavailable(format!(
            "scratch directory for {} is missing",
            state.controller.settings().scratch_path.display()
        )))
    }
}

/// GET /health/live - Liveness check
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_health_healthy() {
        let health = ComponentHealth::healthy(42);
        assert_eq!(health.status, "healthy");
        assert_eq!(health.latency_ms, Some(42));
        assert!(health.error.is_none());
    }

    #[test]
    fn test_component_health_unhealthy() {
        let health = ComponentHealth::unhealthy("missing".to_string());
        assert_eq!(health.status, "unhealthy");
        assert!(health.latency_ms.is_none());
        assert_eq!(health.error, Some("missing".to_string()));
    }
}
