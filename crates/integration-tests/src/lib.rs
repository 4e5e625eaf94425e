//! Integration test harness for Store Hub.
//!
//! Drives the full axum router in-process against the in-memory record
//! store, so tests exercise routing, extraction, status mapping, and the
//! services together without a database or a listening socket.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p store-hub-integration-tests
//! ```

use std::net::{IpAddr, Ipv4Addr};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use store_hub_api::config::StoreHubConfig;
use store_hub_api::db::MemoryStore;
use store_hub_api::routes;
use store_hub_api::state::AppState;

/// Build the full API router over a fresh in-memory store.
#[must_use]
pub fn test_app() -> Router {
    let config = StoreHubConfig {
        database_url: SecretString::from("postgres://unused"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        sentry_dsn: None,
    };
    let state = AppState::new(config, MemoryStore::new());
    routes::routes::<MemoryStore>().with_state(state)
}

/// Send one request through the router and decode the JSON response.
///
/// Returns `Value::Null` for empty bodies (204s).
///
/// # Panics
///
/// Panics when the request cannot be built or the response body is not
/// JSON; both mean the test itself is broken.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router call failed");
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is not JSON")
    };

    (status, value)
}

/// Shorthand for a GET request.
pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

/// Shorthand for a POST request with a JSON body.
pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

/// Shorthand for a PUT request with a JSON body.
pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", uri, Some(body)).await
}

/// Shorthand for a DELETE request.
pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, None).await
}
