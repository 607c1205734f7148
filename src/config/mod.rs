//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → startup builds the route table from it
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; the route table it produces is never
//!   rebuilt while serving
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::RouterConfig;
pub use schema::{ApiConfig, ListenerConfig, ResourceConfig};
pub use schema::{ObservabilityConfig, SecurityConfig, TimeoutConfig};
pub use validation::{validate_config, ValidationError};
