//! Shared helpers for HTTP-level tests
//!
//! Every test gets its own router over a fresh in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use biocat_server::{
    api,
    config::{Config, StoreBackend},
    features::FeatureState,
    store::MemoryCatalogStore,
};
use serde_json::{json, Value};
use tower::ServiceExt;

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.catalog.store = StoreBackend::Memory;
    config
}

pub fn create_test_app_with(config: Config) -> Router {
    let state = FeatureState::new(Arc::new(MemoryCatalogStore::new()), &config.catalog);
    api::create_router(state, &config)
}

pub fn create_test_app() -> Router {
    create_test_app_with(test_config())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn parse(body: &str) -> Value {
    if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).unwrap()
    }
}

pub async fn get_request(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, parse(&body))
}

pub async fn get_text(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn json_request(app: &Router, method: &str, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method(method)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, parse(&body))
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    json_request(app, "POST", uri, body).await
}

pub async fn put_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    json_request(app, "PUT", uri, body).await
}

pub async fn delete_request(app: &Router, uri: &str) -> StatusCode {
    let request = Request::builder()
        .uri(uri)
        .method("DELETE")
        .body(Body::empty())
        .unwrap();
    send(app, request).await.0
}

pub async fn post_form(app: &Router, uri: &str, body: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Metarhizium robertsii
pub fn taxonomy() -> Value {
    json!({
        "taxa_id": 568076,
        "clade": "E",
        "genus": "Metarhizium",
        "species": "robertsii"
    })
}

pub fn domain(domain_id: &str, start: i32, stop: i32) -> Value {
    json!({
        "pfam_id": {
            "domain_id": domain_id,
            "domain_description": format!("{} family", domain_id)
        },
        "description": format!("{} domain", domain_id),
        "start": start,
        "stop": stop
    })
}

pub fn protein(protein_id: &str, length: i32, domains: Vec<Value>) -> Value {
    json!({
        "protein_id": protein_id,
        "sequence": "MVIGFLLLAVPVLALA",
        "taxonomy": taxonomy(),
        "length": length,
        "domains": domains
    })
}
