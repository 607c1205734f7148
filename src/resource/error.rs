//! Handler error types.

use axum::http::StatusCode;
use thiserror::Error;

use crate::routing::Action;

/// Errors a resource handler can report.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// No member with this identifier.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request payload was rejected.
    #[error("Invalid: {0}")]
    Invalid(String),

    /// A member operation was dispatched without a lookup value.
    #[error("action '{0}' requires a lookup value")]
    MissingLookup(Action),

    /// Any other failure inside the handler.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status the transport layer reports for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::NotFound(_) => StatusCode::NOT_FOUND,
            HandlerError::Invalid(_) => StatusCode::BAD_REQUEST,
            HandlerError::MissingLookup(_) | HandlerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
