//! HTTP API handlers.

use std::time::Instant;

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::metrics;
use crate::SERVICE_NAME;

/// Application state shared with handlers.
///
/// All fields are fixed at startup; handlers never mutate state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Process start instant, for uptime reporting.
    started_at: Instant,
    /// Machine hostname reported by `/info`.
    host: String,
    /// Environment label reported by `/info`.
    env: String,
}

impl AppState {
    /// Create new app state, capturing the start instant.
    pub fn new(host: String, env: String) -> Self {
        Self {
            started_at: Instant::now(),
            host,
            env,
        }
    }

    /// Seconds since startup, rounded to two decimal places.
    pub fn uptime_seconds(&self) -> f64 {
        let secs = self.started_at.elapsed().as_secs_f64();
        (secs * 100.0).round() / 100.0
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Service metadata response.
#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    /// Fixed service name.
    pub service: String,
    /// Machine hostname.
    pub host: String,
    /// Environment label from APP_ENV.
    pub env: String,
    /// Seconds since process start.
    pub uptime_seconds: f64,
}

/// Echo request body.
#[derive(Debug, Serialize, Deserialize)]
pub struct EchoRequest {
    /// Message to round-trip.
    pub message: String,
}

/// Echo response body.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct EchoResponse {
    /// The message sent in the request.
    pub echo: String,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    let start = Instant::now();
    metrics::inc_http_requests("/health");

    let response = Json(HealthResponse { status: "ok" });

    metrics::record_http_latency(start, "/health");
    response
}

/// Service metadata handler.
pub async fn info(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    metrics::inc_http_requests("/info");

    let response = Json(InfoResponse {
        service: SERVICE_NAME.to_string(),
        host: state.host.clone(),
        env: state.env.clone(),
        uptime_seconds: state.uptime_seconds(),
    });

    metrics::record_http_latency(start, "/info");
    response
}

/// Echo handler - round-trips the request message.
pub async fn echo(Json(body): Json<EchoRequest>) -> impl IntoResponse {
    let start = Instant::now();
    metrics::inc_http_requests("/echo");
    metrics::inc_echo_messages();

    let response = Json(EchoResponse { echo: body.message });

    metrics::record_http_latency(start, "/echo");
    response
}
