use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure of one pipeline stage. Every variant is recoverable at the
/// request boundary; none of them poisons shared state.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Unsupported format '{format}' for {operation}")]
    UnsupportedFormat {
        format: String,
        operation: &'static str,
    },

    #[error("No text could be extracted from the {document}")]
    ExtractionFailure { document: &'static str },

    #[error("No meaningful keywords in job description")]
    DivisionByEmptySet,

    #[error("Plain-text document is not valid UTF-8: {0}")]
    DecodingFailure(String),

    #[error("Malformed {format} document: {reason}")]
    MalformedDocument {
        format: &'static str,
        reason: String,
    },
}

impl AnalysisError {
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            AnalysisError::ExtractionFailure { .. } => "EXTRACTION_FAILURE",
            AnalysisError::DivisionByEmptySet => "EMPTY_JOB_KEYWORDS",
            AnalysisError::DecodingFailure(_) => "DECODING_FAILURE",
            AnalysisError::MalformedDocument { .. } => "MALFORMED_DOCUMENT",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AnalysisError::UnsupportedFormat { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Analysis(e) => {
                tracing::warn!(code = e.code(), "Analysis rejected: {e}");
                (e.status(), e.code(), e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
