//! Health and service-info handlers

use std::collections::BTreeMap;

use axum::{extract::State, Json};

use crate::models::{HealthResponse, ServiceInfo};
use crate::AppState;

/// Health check: panel and collaborator availability, read-only
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: state.scanner.is_some(),
        deep_mode_available: true,
        xai_available: false,
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// Service info for the root route
pub async fn info() -> Json<ServiceInfo> {
    let mut endpoints = BTreeMap::new();
    endpoints.insert("/api/scan", "POST - Scan URL for phishing");
    endpoints.insert("/api/health", "GET - Health check");

    Json(ServiceInfo {
        service: "PhishGuard API",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        endpoints,
    })
}
