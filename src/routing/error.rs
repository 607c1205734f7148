//! Routing error types.
//!
//! Registration errors are startup-time and abort initialization.
//! Resolve errors are runtime results translated to HTTP statuses by the
//! transport layer.

use axum::http::Method;
use thiserror::Error;

/// Errors raised while registering resources or building the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A resource with the same (normalized) name already exists.
    #[error("resource '{0}' is already registered")]
    DuplicateResource(String),

    /// Two registrations would produce the same route names.
    #[error("basename '{0}' is already in use")]
    DuplicateBasename(String),

    /// The name cannot be used as a single path segment.
    #[error("invalid resource name '{name}': {reason}")]
    InvalidResourceName { name: String, reason: &'static str },

    /// A route pattern is not a slash-delimited path.
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },

    /// `build()` has already produced the route table.
    #[error("route table has already been built")]
    AlreadyBuilt,
}

/// Outcome of a failed `resolve()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No route matches the path.
    #[error("no route matches '{path}'")]
    NotFound { path: String },

    /// The path matches a route that does not accept this method.
    #[error("method {method} not allowed on '{path}'")]
    MethodNotAllowed {
        method: Method,
        path: String,
        allowed: Vec<Method>,
    },

    /// The path only matches once a trailing slash is appended.
    #[error("'{path}' requires a trailing slash, redirect to '{location}'")]
    TrailingSlashRedirect { path: String, location: String },
}

impl ResolveError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }
}

/// Errors from reverse URL resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReverseError {
    #[error("no route named '{0}'")]
    UnknownRoute(String),

    #[error("route '{route}' requires parameter '{param}'")]
    MissingParameter { route: String, param: String },

    #[error("invalid value for parameter '{param}': {value:?}")]
    InvalidParameter { param: String, value: String },
}
