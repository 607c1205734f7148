//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Check addresses and the public URL parse
//! - Detect conflicting resource registrations
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::RouterConfig;
use crate::routing::router::{normalize_name, validate_identifier};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),

    #[error("api.public_url '{0}' is not an absolute http(s) URL")]
    PublicUrl(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("resource '{name}': {reason}")]
    ResourceName { name: String, reason: String },

    #[error("resource '{0}' is declared more than once")]
    DuplicateResource(String),

    #[error("basename '{0}' is used by more than one resource")]
    DuplicateBasename(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if let Some(public_url) = &config.api.public_url {
        let valid = Url::parse(public_url)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::PublicUrl(public_url.clone()));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let mut names = HashSet::new();
    let mut basenames = HashSet::new();
    for resource in &config.api.resources {
        let name = match normalize_name(&resource.name) {
            Ok(name) => name,
            Err(e) => {
                errors.push(ValidationError::ResourceName {
                    name: resource.name.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let basename = resource.basename.clone().unwrap_or_else(|| name.clone());
        for field in [resource.basename.as_deref(), resource.lookup_field.as_deref()]
            .into_iter()
            .flatten()
        {
            if let Err(e) = validate_identifier(field) {
                errors.push(ValidationError::ResourceName {
                    name: name.clone(),
                    reason: e.to_string(),
                });
            }
        }
        if !names.insert(name.clone()) {
            errors.push(ValidationError::DuplicateResource(name));
        }
        if !basenames.insert(basename.clone()) {
            errors.push(ValidationError::DuplicateBasename(basename));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ResourceConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&RouterConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RouterConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.api.public_url = Some("ftp://files.example.com".into());
        config.timeouts.request_secs = 0;
        config.security.max_body_size = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::BindAddress("nowhere".into()),
                ValidationError::PublicUrl("ftp://files.example.com".into()),
                ValidationError::ZeroTimeout,
                ValidationError::ZeroBodyLimit,
            ]
        );
    }

    #[test]
    fn test_resource_conflicts() {
        let mut config = RouterConfig::default();
        config.api.resources = vec![
            ResourceConfig::new("snippets"),
            ResourceConfig::new("/snippets/"),
            ResourceConfig::new("users").with_basename("snippets"),
            ResourceConfig::new("a/b"),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateResource("snippets".into())));
        assert!(errors.contains(&ValidationError::DuplicateBasename("snippets".into())));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::ResourceName { name, .. } if name == "a/b")));
    }

    #[test]
    fn test_identifier_fields_checked_with_other_errors() {
        let mut config = RouterConfig::default();
        config.timeouts.request_secs = 0;
        config.api.resources = vec![
            ResourceConfig::new("snippets").with_basename("bad name"),
            ResourceConfig::new("users").with_lookup_field("{pk}"),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0], ValidationError::ZeroTimeout);
        assert!(matches!(
            &errors[1],
            ValidationError::ResourceName { name, reason }
                if name == "snippets" && reason.contains("whitespace")
        ));
        assert!(matches!(
            &errors[2],
            ValidationError::ResourceName { name, reason }
                if name == "users" && reason.contains("brace")
        ));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = RouterConfig::default();
        config.observability.metrics_address = "bad".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::MetricsAddress("bad".into())])
        );
    }
}
