use crate::domain::payment::PaymentStatus;
use crate::validate::FieldViolation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored record is malformed: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("validation failed")]
    ValidationFailed(Vec<FieldViolation>),
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("anti-forgery token missing or mismatched")]
    ForgeryRejected,
    #[error("too many requests")]
    RateLimited,
    #[error("{0}")]
    Conflict(String),
    #[error("payment not found")]
    NotFound,
    #[error("cannot {action} a payment in status {from}")]
    InvalidTransition {
        from: PaymentStatus,
        action: &'static str,
    },
    #[error("payment has not been submitted to the network")]
    NotSubmitted,
    #[error("storage operation timed out")]
    Timeout,
    #[error("storage unavailable")]
    StoreUnavailable(#[source] StoreError),
}

impl PortalError {
    pub fn code(&self) -> &'static str {
        match self {
            PortalError::ValidationFailed(_) => "VALIDATION_FAILED",
            PortalError::Unauthenticated => "UNAUTHENTICATED",
            PortalError::ForgeryRejected => "FORGERY_REJECTED",
            PortalError::RateLimited => "RATE_LIMITED",
            PortalError::Conflict(_) => "CONFLICT",
            PortalError::NotFound => "NOT_FOUND",
            PortalError::InvalidTransition { .. } => "INVALID_TRANSITION",
            PortalError::NotSubmitted => "NOT_SUBMITTED",
            PortalError::Timeout => "TIMEOUT",
            PortalError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }
}
