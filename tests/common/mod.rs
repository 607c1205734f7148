//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use resource_router::lifecycle::startup::build_route_table;
use resource_router::resource::{MemoryResource, ResourceHandler};
use resource_router::routing::{ResourceRouter, RouteTable};
use resource_router::{HttpServer, RouterConfig, Shutdown};

/// Route table with `snippets` and `users`, as the default service exposes.
#[allow(dead_code)]
pub fn snippets_and_users() -> Arc<RouteTable> {
    let mut router = ResourceRouter::new();
    router
        .register("snippets", memory())
        .expect("register snippets");
    router.register("users", memory()).expect("register users");
    router.build().expect("build route table")
}

#[allow(dead_code)]
pub fn memory() -> Arc<dyn ResourceHandler> {
    Arc::new(MemoryResource::new())
}

/// Start the HTTP server on an ephemeral port.
///
/// Returns the bound address and the shutdown handle that stops it.
#[allow(dead_code)]
pub async fn start_server(mut config: RouterConfig) -> (SocketAddr, Shutdown) {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let table = build_route_table(&config).expect("build route table");

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, table);
    let server_shutdown = shutdown.signal();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

/// HTTP client that does not follow redirects.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
