//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging via `tracing` fields, not formatted strings
//! - Request ID flows through every request span
//! - Metrics are cheap (atomic increments) and off by default

pub mod logging;
pub mod metrics;
