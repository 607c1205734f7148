//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     register(name, handler) × N
//!     → router.rs (validate names, reject duplicates)
//!     → build() generates collection + member routes per resource
//!     → Freeze as immutable RouteTable (shared via Arc)
//!
//! Incoming Request (method, path)
//!     → table.rs (route lookup)
//!     → matcher.rs (match path template, extract lookup value)
//!     → action.rs (method → operation)
//!     → Return: Resolved route, or NotFound / MethodNotAllowed / redirect
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (literal segments plus one dynamic segment)
//! - Deterministic: same input always resolves to the same route
//! - Trailing slash is canonical; slashless paths redirect or 404

pub mod action;
pub mod error;
pub mod matcher;
pub mod router;
pub mod table;

pub use action::Action;
pub use error::{RegistrationError, ResolveError, ReverseError};
pub use matcher::{PathParams, PathTemplate};
pub use router::{Registration, ResourceRouter};
pub use table::{Endpoint, EndpointInfo, Resolved, Resource, RouteTable, API_ROOT_NAME};
