//! HTTP middleware: CORS and request tracing

use axum::http::{header, HeaderValue, Method};
use std::time::Duration;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

use crate::config::CorsConfig;

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(3600);

/// An empty list or a `*` entry opens the API to every origin
fn is_open(config: &CorsConfig) -> bool {
    config.allowed_origins.is_empty() || config.allowed_origins.iter().any(|o| o == "*")
}

/// Origins the catalog answers cross-origin requests for
///
/// Entries that are not valid header values are dropped with a warning.
fn allowed_origins(config: &CorsConfig) -> AllowOrigin {
    if is_open(config) {
        return AllowOrigin::any();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();
    AllowOrigin::list(origins)
}

/// CORS for the JSON API and the entry form
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    // Browsers reject credentials combined with a wildcard origin
    let credentials = config.allow_credentials && !is_open(config);

    CorsLayer::new()
        .allow_origin(allowed_origins(config))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
        .allow_credentials(credentials)
        .max_age(PREFLIGHT_MAX_AGE)
}

/// Access log: one span per request, response status and latency at INFO
pub fn tracing_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Micros),
        )
}
