//! REST resource router.
//!
//! Registers named resource collections, compiles them once into an
//! immutable route table (collection + member routes and a discovery root),
//! and serves that table over HTTP.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resource;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use resource::{ResourceHandler, MemoryResource};
pub use routing::{Action, ResourceRouter, RouteTable};
