//! Response construction.
//!
//! # Responsibilities
//! - Map routing outcomes to status codes (404, 405 + Allow, 308 + Location)
//! - Map handler errors to status codes
//! - Render every error as `{"detail": "..."}`
//!
//! # Design Decisions
//! - Internal handler errors are logged, never echoed to the client
//! - HEAD responses keep status and headers but drop the body

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::resource::{HandlerError, Reply};
use crate::routing::ResolveError;

/// Everything that can turn a request into an error response.
#[derive(Debug)]
pub enum ApiError {
    Resolve(ResolveError),
    Handler(HandlerError),
    /// The request body was not valid JSON.
    MalformedBody(String),
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        ApiError::Resolve(err)
    }
}

impl From<HandlerError> for ApiError {
    fn from(err: HandlerError) -> Self {
        ApiError::Handler(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Resolve(ResolveError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Resolve(ResolveError::MethodNotAllowed { .. }) => {
                StatusCode::METHOD_NOT_ALLOWED
            }
            ApiError::Resolve(ResolveError::TrailingSlashRedirect { .. }) => {
                StatusCode::PERMANENT_REDIRECT
            }
            ApiError::Handler(e) => e.status(),
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Resolve(ResolveError::NotFound { .. }) => "Not found.".to_string(),
            ApiError::Resolve(ResolveError::MethodNotAllowed { method, .. }) => {
                format!("Method \"{method}\" not allowed.")
            }
            ApiError::Resolve(ResolveError::TrailingSlashRedirect { location, .. }) => {
                format!("Moved to {location}.")
            }
            ApiError::Handler(HandlerError::NotFound(_)) => "Not found.".to_string(),
            ApiError::Handler(HandlerError::Invalid(msg)) => msg.clone(),
            ApiError::Handler(_) => "A server error occurred.".to_string(),
            ApiError::MalformedBody(msg) => format!("JSON parse error - {msg}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "Handler failed");
        }

        let mut response = (status, Json(json!({ "detail": self.detail() }))).into_response();
        match &self {
            ApiError::Resolve(ResolveError::MethodNotAllowed { allowed, .. }) => {
                let allow = allowed
                    .iter()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                if let Ok(value) = HeaderValue::from_str(&allow) {
                    response.headers_mut().insert(header::ALLOW, value);
                }
            }
            ApiError::Resolve(ResolveError::TrailingSlashRedirect { location, .. }) => {
                if let Ok(value) = HeaderValue::from_str(location) {
                    response.headers_mut().insert(header::LOCATION, value);
                }
            }
            _ => {}
        }
        response
    }
}

/// Render a successful handler reply. `head` drops the body.
pub fn reply_response(reply: Reply, head: bool) -> Response {
    let status = reply.status();
    match reply.into_body() {
        Some(body) if !head => (status, Json(body)).into_response(),
        _ => status.into_response(),
    }
}
