use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum AppError {
    #[error("Unknown target {0}")]
    TargetNotFound(String),

    #[error("Invalid request: {0}")]
    ValidationError(String),

    /// A backend was unreachable, timed out, or answered with a non-success status.
    /// `status` is the backend's HTTP status when one was received.
    #[error("{message}")]
    DownstreamError {
        status: Option<u16>,
        message: String,
        details: Option<Value>,
    },

    #[error("Ingestion failed: {0}")]
    IngestError(String),

    #[error("Embedding failed: {0}")]
    EmbeddingError(String),
}

impl AppError {
    pub fn downstream(message: impl Into<String>) -> Self {
        AppError::DownstreamError {
            status: None,
            message: message.into(),
            details: None,
        }
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::TargetNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DownstreamError { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AppError::IngestError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::EmbeddingError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// The normalized `{ error, details? }` body, also used inline by the agent.
    pub fn to_body(&self) -> ErrorResponse {
        let details = match self {
            AppError::DownstreamError { details, .. } => details.clone(),
            _ => None,
        };
        ErrorResponse {
            error: self.to_string(),
            details,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AppError::TargetNotFound(name) => {
                tracing::warn!(target_name = %name, "Unknown target");
            }
            AppError::ValidationError(msg) => {
                tracing::warn!(error = %msg, "Validation error");
            }
            AppError::DownstreamError {
                status: upstream,
                message,
                ..
            } => {
                tracing::error!(upstream_status = ?upstream, error = %message, "Downstream error");
            }
            AppError::IngestError(msg) => {
                tracing::error!(error = %msg, "Ingestion error");
            }
            AppError::EmbeddingError(msg) => {
                tracing::error!(error = %msg, "Embedding error");
            }
        }

        (status, Json(self.to_body())).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_target_maps_to_404() {
        let err = AppError::TargetNotFound("jira".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_body().error, "Unknown target jira");
    }

    #[test]
    fn test_downstream_uses_backend_status() {
        let err = AppError::DownstreamError {
            status: Some(503),
            message: "backend unavailable".into(),
            details: Some(json!({ "reason": "maintenance" })),
        };
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.to_body().details, Some(json!({ "reason": "maintenance" })));
    }

    #[test]
    fn test_downstream_without_status_is_500() {
        let err = AppError::downstream("connection refused");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_details_omitted_when_absent() {
        let body = serde_json::to_value(AppError::ValidationError("bad".into()).to_body()).unwrap();
        assert!(body.get("details").is_none());
        assert!(body["error"].as_str().unwrap().contains("bad"));
    }
}
