//! Request and smoke-probe metrics.
//!
//! Counters and latency histograms for:
//! - HTTP requests served per endpoint
//! - Echo messages round-tripped
//! - Smoke probe attempts and check outcomes

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{debug, info};

// === Metric Name Constants ===

/// HTTP requests served counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Echo messages counter metric name.
pub const METRIC_ECHO_MESSAGES: &str = "echo_messages_total";
/// Smoke probe attempts counter metric name.
pub const METRIC_SMOKE_PROBE_ATTEMPTS: &str = "smoke_probe_attempts_total";
/// Smoke probe latency metric name.
pub const METRIC_SMOKE_PROBE_LATENCY: &str = "smoke_probe_latency_ms";
/// Smoke checks passed counter metric name.
pub const METRIC_SMOKE_CHECKS_PASSED: &str = "smoke_checks_passed_total";
/// Smoke checks failed counter metric name.
pub const METRIC_SMOKE_CHECKS_FAILED: &str = "smoke_checks_failed_total";
/// Smoke check latency metric name.
pub const METRIC_SMOKE_CHECK_LATENCY: &str = "smoke_check_latency_ms";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_HTTP_REQUESTS, "Total HTTP requests served");
    describe_counter!(METRIC_ECHO_MESSAGES, "Total echo messages round-tripped");
    describe_counter!(
        METRIC_SMOKE_PROBE_ATTEMPTS,
        "Total health polls issued by the smoke probe"
    );
    describe_counter!(METRIC_SMOKE_CHECKS_PASSED, "Total smoke checks that passed");
    describe_counter!(METRIC_SMOKE_CHECKS_FAILED, "Total smoke checks that failed");

    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request handling latency in milliseconds"
    );
    describe_histogram!(
        METRIC_SMOKE_PROBE_LATENCY,
        "Health poll round-trip latency in milliseconds"
    );
    describe_histogram!(
        METRIC_SMOKE_CHECK_LATENCY,
        "Smoke check latency in milliseconds"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder with its own HTTP listener.
///
/// Call at most once per process, before any metrics are recorded.
pub fn install_recorder(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("failed to install metrics recorder: {}", e))?;

    init_metrics();

    info!(listen_addr = %addr, "Prometheus metrics endpoint active");

    Ok(())
}

/// Increment the request counter for an endpoint.
pub fn inc_http_requests(endpoint: &'static str) {
    counter!(METRIC_HTTP_REQUESTS, "endpoint" => endpoint).increment(1);
}

/// Record request handling latency for an endpoint.
pub fn record_http_latency(start: Instant, endpoint: &'static str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint).record(latency_ms);
}

/// Increment the echo message counter.
pub fn inc_echo_messages() {
    counter!(METRIC_ECHO_MESSAGES).increment(1);
}

/// Increment the smoke probe attempt counter.
pub fn inc_smoke_probe_attempts() {
    counter!(METRIC_SMOKE_PROBE_ATTEMPTS).increment(1);
}

/// Record a health poll round-trip latency.
pub fn record_smoke_probe_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_SMOKE_PROBE_LATENCY).record(latency_ms);
}

/// Increment the smoke checks passed counter.
pub fn inc_smoke_checks_passed() {
    counter!(METRIC_SMOKE_CHECKS_PASSED).increment(1);
}

/// Increment the smoke checks failed counter.
pub fn inc_smoke_checks_failed() {
    counter!(METRIC_SMOKE_CHECKS_FAILED).increment(1);
}

/// Record a smoke check latency.
pub fn record_smoke_check_latency(start: Instant, check: &'static str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_SMOKE_CHECK_LATENCY, "check" => check).record(latency_ms);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let latency_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(self.metric_name).record(latency_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn latency_timer_measures_time() {
        let timer = LatencyTimer::new("test_metric");
        sleep(Duration::from_millis(10));
        let elapsed = timer.elapsed_ms();
        assert!(elapsed >= 9.0); // Allow some tolerance
        // Timer will record on drop
    }
}
