#![allow(dead_code)]

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use record_service::{app, apply_migrations, connect, AppConfig, AppState};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub async fn memory_pool() -> SqlitePool {
    let pool = connect("sqlite::memory:", 1).await.expect("open in-memory database");
    apply_migrations(&pool).await.expect("create tables");
    pool
}

/// Pool over a database file inside a fresh temporary directory; keep the directory alive
/// for as long as the pool is used.
pub async fn file_pool(max_connections: u32) -> (tempfile::TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("records.db").display());
    let pool = connect(&url, max_connections).await.expect("open database file");
    apply_migrations(&pool).await.expect("create tables");
    (dir, pool)
}

pub async fn test_app_with(config: AppConfig) -> Router {
    let pool = memory_pool().await;
    app(AppState::new(pool, config))
}

pub async fn test_app() -> Router {
    test_app_with(AppConfig {
        database_url: "sqlite::memory:".into(),
        ..AppConfig::default()
    })
    .await
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");
    let response = app.clone().oneshot(request).await.expect("infallible router");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    TestResponse { status, headers, body }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> TestResponse {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> TestResponse {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::DELETE, uri, None).await
}

pub fn total_count(response: &TestResponse) -> i64 {
    response
        .headers
        .get("x-total-count")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .expect("x-total-count header")
}
