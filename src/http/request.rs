//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every request
//! - Derive the absolute base URL used for links in responses
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A client-supplied `x-request-id` is kept, not replaced

use axum::http::{header, HeaderMap, HeaderValue, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::Url;
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates `x-request-id` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Access to the request ID header.
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl RequestIdExt for HeaderMap {
    fn request_id(&self) -> &str {
        self.get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// Base URL for absolute links.
///
/// The authority comes from the `Host` header, or from the request URI
/// when the header is absent (HTTP/2 sends `:authority` instead). The
/// scheme is taken from the URI when present and defaults to `http`.
/// Falls back to `fallback` when neither yields a usable URL.
pub fn base_url_from_request(uri: &Uri, headers: &HeaderMap, fallback: &Url) -> Url {
    let scheme = uri.scheme_str().unwrap_or("http");
    headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .and_then(|host| Url::parse(&format!("{scheme}://{host}/")).ok())
        .unwrap_or_else(|| fallback.clone())
}
