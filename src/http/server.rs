//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with a single dispatching handler
//! - Wire up middleware (request ID, tracing, timeout, body limit, headers)
//! - Resolve every request through the route table
//! - Invoke resource handlers and render their replies
//! - Serve until a shutdown signal arrives

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RouterConfig;
use crate::http::request::{base_url_from_request, RequestIdExt, UuidRequestId};
use crate::http::response::{reply_response, ApiError};
use crate::lifecycle::signals::terminate_signal;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::resource::dispatch;
use crate::routing::{Action, Endpoint, ResolveError, Resource, RouteTable};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    /// Build root index links from the Host header instead of the
    /// configured public URL.
    pub links_from_host: bool,
}

/// HTTP server exposing the route table.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
}

impl HttpServer {
    pub fn new(config: RouterConfig, table: Arc<RouteTable>) -> Self {
        let state = AppState {
            table,
            links_from_host: config.api.public_url.is_none(),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(
                TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = %req.headers().request_id(),
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(DefaultBodyLimit::disable())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        let router = Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(middleware);

        if config.security.enable_headers {
            router.layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
        } else {
            router
        }
    }

    /// The configured Axum router, for serving on a custom transport.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until Ctrl+C/SIGTERM or a `Shutdown` trigger.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            resources = self.config.api.resources.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = terminate_signal() => {}
                    _ = shutdown.wait() => {}
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

/// Single entry point: resolve, then serve the discovery view or invoke
/// the resource handler.
async fn dispatch_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start_time = Instant::now();
    let path = uri.path();
    let head = method == Method::HEAD;

    let resolved = match state.table.resolve(&method, path) {
        Ok(resolved) => resolved,
        Err(err) => {
            let err = with_query(err, uri.query());
            metrics::record_resolve_failure(failure_kind(&err));
            tracing::debug!(
                request_id = %headers.request_id(),
                method = %method,
                path = %path,
                error = %err,
                "Request did not resolve"
            );
            let response = ApiError::from(err).into_response();
            metrics::record_request(method.as_str(), response.status().as_u16(), "none", start_time);
            return response;
        }
    };

    let response = match &resolved.endpoint {
        Endpoint::ApiRoot => {
            let index = if state.links_from_host {
                let base = base_url_from_request(&uri, &headers, state.table.base_url());
                state.table.root_index_at(&base)
            } else {
                state.table.root_index()
            };
            if head {
                StatusCode::OK.into_response()
            } else {
                Json(index).into_response()
            }
        }
        Endpoint::Resource { resource, action } => {
            tracing::debug!(
                request_id = %headers.request_id(),
                resource = %resource.name(),
                action = %action,
                lookup = ?resolved.lookup(),
                "Dispatching to resource handler"
            );
            invoke(resource, *action, resolved.lookup(), &body, head)
                .await
                .unwrap_or_else(IntoResponse::into_response)
        }
    };

    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        &resolved.route_name,
        start_time,
    );
    response
}

async fn invoke(
    resource: &Resource,
    action: Action,
    lookup: Option<&str>,
    body: &Bytes,
    head: bool,
) -> Result<Response, ApiError> {
    let payload = if action.takes_body() {
        parse_body(body)?
    } else {
        Value::Null
    };
    let reply = dispatch(resource.handler().as_ref(), action, lookup, payload).await?;
    Ok(reply_response(reply, head))
}

/// An empty body counts as an empty object.
fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

/// Carry the query string over to a trailing-slash redirect.
fn with_query(err: ResolveError, query: Option<&str>) -> ResolveError {
    match (err, query) {
        (ResolveError::TrailingSlashRedirect { path, location }, Some(q)) if !q.is_empty() => {
            ResolveError::TrailingSlashRedirect {
                path,
                location: format!("{location}?{q}"),
            }
        }
        (err, _) => err,
    }
}

fn failure_kind(err: &ResolveError) -> &'static str {
    match err {
        ResolveError::NotFound { .. } => "not_found",
        ResolveError::MethodNotAllowed { .. } => "method_not_allowed",
        ResolveError::TrailingSlashRedirect { .. } => "redirect",
    }
}
