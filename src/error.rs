//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::logic::ensemble::PanelError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// Panel or feature-name list never loaded; all scoring is unavailable
    ModelNotLoaded,

    /// Request failed validation (e.g. missing url)
    ValidationError(String),

    /// Any other internal failure
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::ModelNotLoaded => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Model not loaded".to_string())
            }
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<PanelError> for AppError {
    fn from(err: PanelError) -> Self {
        AppError::InternalError(err.to_string())
    }
}
