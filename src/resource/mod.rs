//! Resource handler capability set.
//!
//! # Data Flow
//! ```text
//! Resolved route (resource, action, lookup)
//!     → dispatch() picks the handler operation
//!     → ResourceHandler (external collaborator)
//!     → Reply (payload + success status) or HandlerError
//! ```
//!
//! # Design Decisions
//! - Handlers exchange `serde_json::Value`; serialization rules belong to
//!   the handler, not the router
//! - The router never retries a handler call
//! - `MemoryResource` is a process-local collaborator for the server binary
//!   and tests

pub mod error;
pub mod memory;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::Value;

use crate::routing::Action;

pub use error::HandlerError;
pub use memory::MemoryResource;

/// Operations a registered resource must provide.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    async fn list(&self) -> Result<Vec<Value>, HandlerError>;

    async fn create(&self, body: Value) -> Result<Value, HandlerError>;

    async fn retrieve(&self, id: &str) -> Result<Value, HandlerError>;

    /// Replace the member entirely.
    async fn update(&self, id: &str, body: Value) -> Result<Value, HandlerError>;

    /// Change only the supplied fields.
    async fn partial_update(&self, id: &str, body: Value) -> Result<Value, HandlerError>;

    async fn delete(&self, id: &str) -> Result<(), HandlerError>;
}

/// Successful handler outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Collection(Vec<Value>),
    Member(Value),
    Created(Value),
    Deleted,
}

impl Reply {
    pub fn status(&self) -> StatusCode {
        match self {
            Reply::Collection(_) | Reply::Member(_) => StatusCode::OK,
            Reply::Created(_) => StatusCode::CREATED,
            Reply::Deleted => StatusCode::NO_CONTENT,
        }
    }

    /// JSON body, if the reply has one.
    pub fn into_body(self) -> Option<Value> {
        match self {
            Reply::Collection(items) => Some(Value::Array(items)),
            Reply::Member(item) | Reply::Created(item) => Some(item),
            Reply::Deleted => None,
        }
    }
}

/// Invoke the handler operation for `action`.
///
/// `lookup` must be present for member actions. `body` is ignored by
/// actions that do not take one.
pub async fn dispatch(
    handler: &dyn ResourceHandler,
    action: Action,
    lookup: Option<&str>,
    body: Value,
) -> Result<Reply, HandlerError> {
    let id = || lookup.ok_or(HandlerError::MissingLookup(action));

    match action {
        Action::List => handler.list().await.map(Reply::Collection),
        Action::Create => handler.create(body).await.map(Reply::Created),
        Action::Retrieve => handler.retrieve(id()?).await.map(Reply::Member),
        Action::Update => handler.update(id()?, body).await.map(Reply::Member),
        Action::PartialUpdate => handler.partial_update(id()?, body).await.map(Reply::Member),
        Action::Delete => handler.delete(id()?).await.map(|()| Reply::Deleted),
    }
}
