//! End-to-end tests against a live listener.

use reqwest::StatusCode;
use serde_json::{json, Value};

use resource_router::config::ResourceConfig;
use resource_router::RouterConfig;

mod common;

#[tokio::test]
async fn test_discovery_endpoint() {
    let (addr, shutdown) = common::start_server(RouterConfig::default()).await;
    let client = common::client();

    let res = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "snippets": format!("http://{addr}/snippets/"),
            "users": format!("http://{addr}/users/"),
        })
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_crud_lifecycle() {
    let (addr, shutdown) = common::start_server(RouterConfig::default()).await;
    let client = common::client();
    let base = format!("http://{addr}/snippets/");

    let res = client
        .post(&base)
        .json(&json!({"title": "hello", "code": "print('hi')"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["id"], 1);

    let listed: Value = client.get(&base).send().await.unwrap().json().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let res = client
        .patch(format!("{base}1/"))
        .json(&json!({"title": "bye"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let patched: Value = res.json().await.unwrap();
    assert_eq!(patched["title"], "bye");
    assert_eq!(patched["code"], "print('hi')");

    let res = client
        .put(format!("{base}1/"))
        .json(&json!({"title": "replaced"}))
        .send()
        .await
        .unwrap();
    let replaced: Value = res.json().await.unwrap();
    assert_eq!(replaced, json!({"id": 1, "title": "replaced"}));

    let res = client.delete(format!("{base}1/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(format!("{base}1/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"detail": "Not found."}));

    shutdown.trigger();
}

#[tokio::test]
async fn test_routing_failures_map_to_status_codes() {
    let (addr, shutdown) = common::start_server(RouterConfig::default()).await;
    let client = common::client();

    let res = client
        .get(format!("http://{addr}/unknown/"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .post(format!("http://{addr}/snippets/5/"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers()["allow"], "GET, PUT, PATCH, DELETE, HEAD");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "Method \"POST\" not allowed.");

    let res = client
        .get(format!("http://{addr}/users"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(res.headers()["location"], "/users/");

    shutdown.trigger();
}

#[tokio::test]
async fn test_strict_slash_and_custom_resources() {
    let mut config = RouterConfig::default();
    config.api.append_slash = false;
    config.api.public_url = Some("https://api.example.com/v1/".into());
    config.api.resources = vec![ResourceConfig::new("articles")
        .with_basename("article")
        .with_lookup_field("slug")];

    let (addr, shutdown) = common::start_server(config).await;
    let client = common::client();

    let res = client
        .get(format!("http://{addr}/articles"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = client
        .get(format!("http://{addr}/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"articles": "https://api.example.com/v1/articles/"}));

    let res = client
        .get(format!("http://{addr}/snippets/"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    shutdown.trigger();
}

#[tokio::test]
async fn test_body_limit() {
    let mut config = RouterConfig::default();
    config.security.max_body_size = 64;

    let (addr, shutdown) = common::start_server(config).await;
    let client = common::client();

    let res = client
        .post(format!("http://{addr}/users/"))
        .json(&json!({"name": "x".repeat(256)}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);

    shutdown.trigger();
}

#[tokio::test]
async fn test_body_limit_above_extractor_default() {
    let mut config = RouterConfig::default();
    config.security.max_body_size = 8 * 1024 * 1024;

    let (addr, shutdown) = common::start_server(config).await;
    let client = common::client();

    let res = client
        .post(format!("http://{addr}/snippets/"))
        .json(&json!({"code": "x".repeat(3 * 1024 * 1024)}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let created: Value = res.json().await.unwrap();
    assert_eq!(created["code"].as_str().map(str::len), Some(3 * 1024 * 1024));

    shutdown.trigger();
}
