//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn the validated configuration into resource registrations
//! - Build the route table before any listener is bound
//!
//! # Design Decisions
//! - Fail fast: a duplicate or invalid registration aborts startup
//! - Handlers are supplied by a factory so binaries and tests choose the
//!   collaborator behind each resource

use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::config::{ResourceConfig, RouterConfig};
use crate::resource::{MemoryResource, ResourceHandler};
use crate::routing::{Registration, RegistrationError, ResourceRouter, RouteTable};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("resource registration failed: {0}")]
    Registration(#[from] RegistrationError),

    #[error("invalid public URL: {0}")]
    PublicUrl(#[from] url::ParseError),
}

/// Build the route table with an in-memory handler per resource.
pub fn build_route_table(config: &RouterConfig) -> Result<Arc<RouteTable>, StartupError> {
    build_route_table_with(config, |_| Arc::new(MemoryResource::new()))
}

/// Build the route table, asking `make_handler` for each resource's handler.
pub fn build_route_table_with<F>(
    config: &RouterConfig,
    mut make_handler: F,
) -> Result<Arc<RouteTable>, StartupError>
where
    F: FnMut(&ResourceConfig) -> Arc<dyn ResourceHandler>,
{
    let mut router = ResourceRouter::new().with_append_slash(config.api.append_slash);
    if let Some(public_url) = &config.api.public_url {
        router = router.with_base_url(Url::parse(public_url)?);
    }

    for resource in &config.api.resources {
        let mut registration = Registration::new(&resource.name, make_handler(resource));
        if let Some(basename) = &resource.basename {
            registration = registration.basename(basename);
        }
        if let Some(field) = &resource.lookup_field {
            registration = registration.lookup_field(field);
        }
        router.add(registration)?;
    }

    Ok(router.build()?)
}
