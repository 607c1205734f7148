//! Route table lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes in registration order
//! - Resolve (method, path) to a resource operation with path parameters
//! - Report explicit NotFound / MethodNotAllowed / trailing-slash outcomes
//! - Compute the root index and reverse route names to paths
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) route scan (acceptable for typical resource counts)
//! - Explicit errors rather than silent default routes

use axum::http::Method;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use url::Url;

use crate::resource::ResourceHandler;
use crate::routing::action::Action;
use crate::routing::error::{RegistrationError, ResolveError, ReverseError};
use crate::routing::matcher::{PathParams, PathTemplate};

/// Route name of the discovery endpoint served at `/`.
pub const API_ROOT_NAME: &str = "api-root";

/// A registered resource collection.
pub struct Resource {
    name: String,
    basename: String,
    lookup_field: String,
    handler: Arc<dyn ResourceHandler>,
}

impl Resource {
    pub(crate) fn new(
        name: String,
        basename: String,
        lookup_field: String,
        handler: Arc<dyn ResourceHandler>,
    ) -> Self {
        Self {
            name,
            basename,
            lookup_field,
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    pub fn lookup_field(&self) -> &str {
        &self.lookup_field
    }

    pub fn handler(&self) -> &Arc<dyn ResourceHandler> {
        &self.handler
    }

    /// `/{name}/`
    pub fn collection_path(&self) -> String {
        format!("/{}/", self.name)
    }

    /// `/{name}/{lookup_field}/`
    pub fn member_pattern(&self) -> String {
        format!("/{}/{{{}}}/", self.name, self.lookup_field)
    }

    pub fn list_route_name(&self) -> String {
        format!("{}-list", self.basename)
    }

    pub fn detail_route_name(&self) -> String {
        format!("{}-detail", self.basename)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("basename", &self.basename)
            .field("lookup_field", &self.lookup_field)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
enum RouteKind {
    Root,
    Collection(Arc<Resource>),
    Member(Arc<Resource>),
}

impl RouteKind {
    fn endpoint(&self, method: &Method) -> Option<Endpoint> {
        match self {
            RouteKind::Root => {
                matches!(*method, Method::GET | Method::HEAD).then_some(Endpoint::ApiRoot)
            }
            RouteKind::Collection(resource) => {
                Action::for_collection(method).map(|action| Endpoint::Resource {
                    resource: resource.clone(),
                    action,
                })
            }
            RouteKind::Member(resource) => {
                Action::for_member(method).map(|action| Endpoint::Resource {
                    resource: resource.clone(),
                    action,
                })
            }
        }
    }

    fn allowed_methods(&self) -> Vec<Method> {
        match self {
            RouteKind::Root => vec![Method::GET, Method::HEAD],
            RouteKind::Collection(_) => Action::collection_methods(),
            RouteKind::Member(_) => Action::member_methods(),
        }
    }
}

#[derive(Debug)]
struct Route {
    name: String,
    template: PathTemplate,
    kind: RouteKind,
}

/// What a resolved request addresses.
#[derive(Debug, Clone)]
pub enum Endpoint {
    /// The discovery view at `/`.
    ApiRoot,
    /// An operation on a registered resource.
    Resource {
        resource: Arc<Resource>,
        action: Action,
    },
}

/// A successful route resolution.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub route_name: String,
    pub endpoint: Endpoint,
    pub params: PathParams,
}

impl Resolved {
    pub fn action(&self) -> Option<Action> {
        match &self.endpoint {
            Endpoint::Resource { action, .. } => Some(*action),
            Endpoint::ApiRoot => None,
        }
    }

    pub fn resource(&self) -> Option<&Arc<Resource>> {
        match &self.endpoint {
            Endpoint::Resource { resource, .. } => Some(resource),
            Endpoint::ApiRoot => None,
        }
    }

    /// Value of the resource's lookup segment, for member routes.
    pub fn lookup(&self) -> Option<&str> {
        self.resource()
            .and_then(|resource| self.params.get(resource.lookup_field()))
    }
}

/// One row of the route table, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointInfo {
    pub method: Method,
    pub pattern: String,
    pub route_name: String,
    pub operation: &'static str,
}

impl fmt::Display for EndpointInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<7} {:<28} {:<20} {}",
            self.method.as_str(),
            self.pattern,
            self.route_name,
            self.operation
        )
    }
}

/// Immutable routing table produced by [`ResourceRouter::build`].
///
/// [`ResourceRouter::build`]: crate::routing::ResourceRouter::build
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
    resources: Vec<Arc<Resource>>,
    base_url: Url,
    append_slash: bool,
}

impl RouteTable {
    pub(crate) fn compile(
        resources: Vec<Resource>,
        base_url: Url,
        append_slash: bool,
    ) -> Result<Self, RegistrationError> {
        let resources: Vec<Arc<Resource>> = resources.into_iter().map(Arc::new).collect();

        let mut routes = Vec::with_capacity(1 + resources.len() * 2);
        routes.push(Route {
            name: API_ROOT_NAME.to_string(),
            template: PathTemplate::new("/")?,
            kind: RouteKind::Root,
        });
        for resource in &resources {
            routes.push(Route {
                name: resource.list_route_name(),
                template: PathTemplate::new(resource.collection_path())?,
                kind: RouteKind::Collection(resource.clone()),
            });
            routes.push(Route {
                name: resource.detail_route_name(),
                template: PathTemplate::new(resource.member_pattern())?,
                kind: RouteKind::Member(resource.clone()),
            });
        }

        Ok(Self {
            routes,
            resources,
            base_url: normalize_base(base_url),
            append_slash,
        })
    }

    /// Resolve a request to a route.
    pub fn resolve(&self, method: &Method, path: &str) -> Result<Resolved, ResolveError> {
        if let Some((route, params)) = self.match_path(path) {
            return match route.kind.endpoint(method) {
                Some(endpoint) => Ok(Resolved {
                    route_name: route.name.clone(),
                    endpoint,
                    params,
                }),
                None => {
                    tracing::debug!(%method, path, route = %route.name, "Method not allowed");
                    Err(ResolveError::MethodNotAllowed {
                        method: method.clone(),
                        path: path.to_string(),
                        allowed: route.kind.allowed_methods(),
                    })
                }
            };
        }

        if self.append_slash && !path.ends_with('/') {
            let location = format!("{path}/");
            if self.match_path(&location).is_some() {
                tracing::debug!(path, location = %location, "Redirecting to canonical path");
                return Err(ResolveError::TrailingSlashRedirect {
                    path: path.to_string(),
                    location,
                });
            }
        }

        tracing::debug!(%method, path, "No route matched");
        Err(ResolveError::not_found(path))
    }

    /// Resource name → absolute collection URL, using the configured base.
    pub fn root_index(&self) -> BTreeMap<String, String> {
        self.index_for(&self.base_url)
    }

    /// Resource name → absolute collection URL under `base`.
    pub fn root_index_at(&self, base: &Url) -> BTreeMap<String, String> {
        self.index_for(&normalize_base(base.clone()))
    }

    fn index_for(&self, base: &Url) -> BTreeMap<String, String> {
        self.resources
            .iter()
            .map(|resource| {
                let url = format!("{}{}/", base.as_str(), resource.name());
                (resource.name().to_string(), url)
            })
            .collect()
    }

    /// Build a path from a route name, e.g. `snippet-detail` → `/snippets/5/`.
    pub fn reverse(&self, route_name: &str, params: &[(&str, &str)]) -> Result<String, ReverseError> {
        let route = self
            .routes
            .iter()
            .find(|r| r.name == route_name)
            .ok_or_else(|| ReverseError::UnknownRoute(route_name.to_string()))?;
        route.template.render(route_name, params)
    }

    /// Every (method, pattern) pair in table order. HEAD is implied by GET
    /// and not listed.
    pub fn endpoints(&self) -> Vec<EndpointInfo> {
        let mut rows = Vec::new();
        for route in &self.routes {
            for method in route.kind.allowed_methods() {
                if method == Method::HEAD {
                    continue;
                }
                let operation = match route.kind.endpoint(&method) {
                    Some(Endpoint::Resource { action, .. }) => action.as_str(),
                    Some(Endpoint::ApiRoot) | None => "discovery",
                };
                rows.push(EndpointInfo {
                    method,
                    pattern: route.template.as_str().to_string(),
                    route_name: route.name.clone(),
                    operation,
                });
            }
        }
        rows
    }

    pub fn resources(&self) -> &[Arc<Resource>] {
        &self.resources
    }

    pub fn route_names(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.name.as_str())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn append_slash(&self) -> bool {
        self.append_slash
    }

    fn match_path(&self, path: &str) -> Option<(&Route, PathParams)> {
        self.routes
            .iter()
            .find_map(|route| route.template.matches(path).map(|params| (route, params)))
    }
}

/// Strip query and fragment and make sure the path ends with `/`, so that
/// resource names can be appended directly.
fn normalize_base(mut base: Url) -> Url {
    base.set_query(None);
    base.set_fragment(None);
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}
