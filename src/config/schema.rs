//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router
//! service. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Registered resources and URL policy.
    pub api: ApiConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// API surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Public base URL for absolute links in the root index
    /// (e.g., "https://api.example.com/"). When unset, links are built
    /// from the request's Host header.
    pub public_url: Option<String>,

    /// Redirect slashless paths to their canonical form instead of 404.
    pub append_slash: bool,

    /// Resource collections, in registration order.
    pub resources: Vec<ResourceConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            public_url: None,
            append_slash: true,
            resources: vec![
                ResourceConfig::new("snippets").with_basename("snippet"),
                ResourceConfig::new("users").with_basename("user"),
            ],
        }
    }
}

/// A single resource registration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ResourceConfig {
    /// Collection name; also the URL segment (`/{name}/`).
    pub name: String,

    /// Route name prefix (`{basename}-list`). Defaults to the name.
    #[serde(default)]
    pub basename: Option<String>,

    /// Member route parameter name. Defaults to `id`.
    #[serde(default)]
    pub lookup_field: Option<String>,
}

impl ResourceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            basename: None,
            lookup_field: None,
        }
    }

    pub fn with_basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = Some(basename.into());
        self
    }

    pub fn with_lookup_field(mut self, field: impl Into<String>) -> Self {
        self.lookup_field = Some(field.into());
        self
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: RouterConfig = toml::from_str("").unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.api.append_slash);
        assert_eq!(config.api.resources.len(), 2);
        assert_eq!(config.api.resources[0].name, "snippets");
        assert_eq!(config.api.resources[1].basename.as_deref(), Some("user"));
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_resources_table_replaces_defaults() {
        let config: RouterConfig = toml::from_str(
            r#"
            [api]
            public_url = "https://api.example.com/"
            append_slash = false

            [[api.resources]]
            name = "articles"
            basename = "article"
            lookup_field = "slug"
            "#,
        )
        .unwrap();

        assert!(!config.api.append_slash);
        assert_eq!(
            config.api.resources,
            vec![ResourceConfig::new("articles")
                .with_basename("article")
                .with_lookup_field("slug")]
        );
    }
}
