//! Resource registration and route table compilation.
//!
//! # Responsibilities
//! - Collect resource registrations during initialization
//! - Normalize and validate resource names
//! - Reject duplicate names and basenames
//! - Compile the immutable [`RouteTable`] exactly once
//!
//! # Design Decisions
//! - Registration and build are single-threaded startup steps
//! - The built table is handed out behind `Arc` and never mutated
//! - Building twice is an error rather than a silent rebuild

use std::sync::Arc;
use url::Url;

use crate::resource::ResourceHandler;
use crate::routing::error::RegistrationError;
use crate::routing::table::{Resource, RouteTable};

/// Default base for absolute URLs in the root index.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

/// Default name of the member route's dynamic segment.
pub const DEFAULT_LOOKUP_FIELD: &str = "id";

/// A resource collection waiting to be compiled into routes.
pub struct Registration {
    name: String,
    basename: Option<String>,
    lookup_field: Option<String>,
    handler: Arc<dyn ResourceHandler>,
}

impl Registration {
    pub fn new(name: impl Into<String>, handler: Arc<dyn ResourceHandler>) -> Self {
        Self {
            name: name.into(),
            basename: None,
            lookup_field: None,
            handler,
        }
    }

    /// Prefix for the generated route names (`{basename}-list`,
    /// `{basename}-detail`). Defaults to the resource name.
    pub fn basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = Some(basename.into());
        self
    }

    /// Name of the member route's dynamic segment. Defaults to `id`.
    pub fn lookup_field(mut self, field: impl Into<String>) -> Self {
        self.lookup_field = Some(field.into());
        self
    }
}

/// Builder for the route table.
///
/// ```
/// use std::sync::Arc;
/// use axum::http::Method;
/// use resource_router::resource::MemoryResource;
/// use resource_router::routing::{Action, ResourceRouter};
///
/// let mut router = ResourceRouter::new();
/// router.register("snippets", Arc::new(MemoryResource::new())).unwrap();
/// router.register("users", Arc::new(MemoryResource::new())).unwrap();
/// let table = router.build().unwrap();
///
/// let resolved = table.resolve(&Method::GET, "/snippets/5/").unwrap();
/// assert_eq!(resolved.action(), Some(Action::Retrieve));
/// assert_eq!(resolved.params.get("id"), Some("5"));
/// ```
pub struct ResourceRouter {
    resources: Vec<Resource>,
    base_url: Url,
    append_slash: bool,
    built: bool,
}

impl ResourceRouter {
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
            base_url: default_base_url(),
            append_slash: true,
            built: false,
        }
    }

    /// Base URL used by [`RouteTable::root_index`].
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Whether slashless paths redirect to their canonical form (default)
    /// or fail with NotFound.
    pub fn with_append_slash(mut self, append_slash: bool) -> Self {
        self.append_slash = append_slash;
        self
    }

    /// Register a resource under `name` with default basename and lookup field.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn ResourceHandler>,
    ) -> Result<(), RegistrationError> {
        self.add(Registration::new(name, handler))
    }

    /// Register a fully specified resource.
    pub fn add(&mut self, registration: Registration) -> Result<(), RegistrationError> {
        if self.built {
            return Err(RegistrationError::AlreadyBuilt);
        }

        let name = normalize_name(&registration.name)?;
        if self.resources.iter().any(|r| r.name() == name) {
            tracing::error!(resource = %name, "Duplicate resource registration");
            return Err(RegistrationError::DuplicateResource(name));
        }

        let basename = match registration.basename {
            Some(basename) => validate_identifier(&basename)?,
            None => name.clone(),
        };
        if self.resources.iter().any(|r| r.basename() == basename) {
            tracing::error!(resource = %name, basename = %basename, "Duplicate basename");
            return Err(RegistrationError::DuplicateBasename(basename));
        }

        let lookup_field = match registration.lookup_field {
            Some(field) => validate_identifier(&field)?,
            None => DEFAULT_LOOKUP_FIELD.to_string(),
        };

        tracing::debug!(
            resource = %name,
            basename = %basename,
            lookup_field = %lookup_field,
            "Resource registered"
        );
        self.resources
            .push(Resource::new(name, basename, lookup_field, registration.handler));
        Ok(())
    }

    /// Compile all registrations into the immutable route table.
    pub fn build(&mut self) -> Result<Arc<RouteTable>, RegistrationError> {
        if self.built {
            return Err(RegistrationError::AlreadyBuilt);
        }
        self.built = true;

        let resources = std::mem::take(&mut self.resources);
        let table = RouteTable::compile(resources, self.base_url.clone(), self.append_slash)?;

        tracing::info!(
            resources = table.resources().len(),
            routes = table.route_names().count(),
            append_slash = self.append_slash,
            "Route table built"
        );
        Ok(Arc::new(table))
    }

    pub fn is_built(&self) -> bool {
        self.built
    }
}

impl Default for ResourceRouter {
    fn default() -> Self {
        Self::new()
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

/// Trim surrounding slashes and check the result is a usable path segment.
pub(crate) fn normalize_name(raw: &str) -> Result<String, RegistrationError> {
    let name = raw.trim_matches('/');
    if name.is_empty() {
        return Err(RegistrationError::InvalidResourceName {
            name: raw.to_string(),
            reason: "name is empty",
        });
    }
    if name.contains('/') {
        return Err(RegistrationError::InvalidResourceName {
            name: raw.to_string(),
            reason: "nested paths are not supported",
        });
    }
    if let Some(reason) = invalid_char_reason(name) {
        return Err(RegistrationError::InvalidResourceName {
            name: raw.to_string(),
            reason,
        });
    }
    Ok(name.to_string())
}

/// Basenames and lookup fields share the resource name's character rules.
pub(crate) fn validate_identifier(value: &str) -> Result<String, RegistrationError> {
    if value.is_empty() || value.contains('/') {
        return Err(RegistrationError::InvalidResourceName {
            name: value.to_string(),
            reason: "must be a non-empty single segment",
        });
    }
    if let Some(reason) = invalid_char_reason(value) {
        return Err(RegistrationError::InvalidResourceName {
            name: value.to_string(),
            reason,
        });
    }
    Ok(value.to_string())
}

fn invalid_char_reason(segment: &str) -> Option<&'static str> {
    if segment == "." || segment == ".." {
        Some("is a dot segment")
    } else if !segment.is_ascii() {
        Some("contains non-ASCII characters")
    } else if segment.chars().any(|c| c.is_ascii_whitespace() || c.is_ascii_control()) {
        Some("contains whitespace")
    } else if segment.contains(['{', '}']) {
        Some("contains a brace")
    } else if segment.contains(['?', '#']) {
        Some("contains a query or fragment delimiter")
    } else {
        None
    }
}
