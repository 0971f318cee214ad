//! Scan handler

use axum::{extract::State, Json};

use crate::models::{ScanRequest, ScanResult};
use crate::{AppError, AppResult, AppState};

/// Scan a URL for phishing risk
pub async fn scan(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> AppResult<Json<ScanResult>> {
    let url = req
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::ValidationError("URL is required".to_string()))?;

    let scanner = state.scanner.as_ref().ok_or(AppError::ModelNotLoaded)?;

    if req.explain {
        tracing::debug!("Explain requested for {} but no attribution collaborator is wired", url);
    }

    let result = scanner.scan(url, req.mode).await?;
    Ok(Json(result))
}
