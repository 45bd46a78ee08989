use crate::error::PortalError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

pub fn envelope(code: &str, message: &str, details: Option<serde_json::Value>) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
            details,
        },
    }
}

pub fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(envelope("INTERNAL_ERROR", "internal error", None)),
    )
        .into_response()
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = match &self {
            PortalError::ValidationFailed(_)
            | PortalError::InvalidTransition { .. }
            | PortalError::NotSubmitted => StatusCode::BAD_REQUEST,
            PortalError::Unauthenticated => StatusCode::UNAUTHORIZED,
            PortalError::ForgeryRejected => StatusCode::FORBIDDEN,
            PortalError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            PortalError::Conflict(_) => StatusCode::CONFLICT,
            PortalError::NotFound => StatusCode::NOT_FOUND,
            PortalError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            PortalError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Collaborator detail stays in the server log; callers only see the
        // failure kind.
        let (message, details) = match &self {
            PortalError::ValidationFailed(violations) => (
                "validation failed".to_string(),
                serde_json::to_value(violations).ok(),
            ),
            PortalError::StoreUnavailable(_) => ("internal error".to_string(), None),
            other => (other.to_string(), None),
        };

        (status, Json(envelope(self.code(), &message, details))).into_response()
    }
}
