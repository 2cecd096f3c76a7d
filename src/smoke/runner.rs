//! Smoke-check runner: poll until healthy, then run acceptance checks.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::Config;
use crate::error::SmokeError;
use crate::metrics;
use crate::SERVICE_NAME;

use super::client::TargetClient;

/// Message round-tripped through `/echo` by the smoke suite.
pub const ECHO_PROBE_MESSAGE: &str = "hello-orchestrator";

/// Health polling configuration.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Wall-clock deadline for the target to become healthy.
    pub timeout: Duration,
    /// Fixed delay between polls.
    pub interval: Duration,
    /// Per-poll request timeout.
    pub request_timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(2),
        }
    }
}

impl PollConfig {
    /// Create from config values.
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.smoke_timeout_seconds),
            interval: Duration::from_millis(config.smoke_interval_ms),
            ..Default::default()
        }
    }
}

/// Outcome of a single smoke check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Check name.
    pub name: &'static str,
    /// Whether the check passed.
    pub passed: bool,
    /// Failure detail, if any.
    pub detail: Option<String>,
}

/// Summary of a smoke run.
#[derive(Debug, Clone, Default)]
pub struct SmokeReport {
    /// Per-check outcomes, in execution order.
    pub checks: Vec<CheckResult>,
}

impl SmokeReport {
    /// Whether every check passed.
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Number of checks that passed.
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Number of checks that failed.
    pub fn failed_count(&self) -> usize {
        self.checks.len() - self.passed_count()
    }

    fn record(&mut self, name: &'static str, result: Result<(), SmokeError>) {
        match result {
            Ok(()) => {
                info!(check = name, "Check passed");
                metrics::inc_smoke_checks_passed();
                self.checks.push(CheckResult {
                    name,
                    passed: true,
                    detail: None,
                });
            }
            Err(e) => {
                warn!(check = name, error = %e, "Check failed");
                metrics::inc_smoke_checks_failed();
                self.checks.push(CheckResult {
                    name,
                    passed: false,
                    detail: Some(e.to_string()),
                });
            }
        }
    }
}

/// Poll `/health` until it reports ok or the deadline expires.
///
/// Returns as soon as one poll succeeds; a target that comes up late still
/// passes. On expiry the error carries the last transport error observed.
pub async fn wait_for_healthy(
    client: &TargetClient,
    poll: &PollConfig,
) -> Result<(), SmokeError> {
    let deadline = Instant::now() + poll.timeout;
    let mut last_error: Option<String> = None;

    while Instant::now() < deadline {
        metrics::inc_smoke_probe_attempts();
        let start = Instant::now();

        match client.get_health(poll.request_timeout).await {
            Ok(payload) if payload.status == "ok" => {
                metrics::record_smoke_probe_latency(start);
                info!(base_url = %client.base_url(), "Target is healthy");
                return Ok(());
            }
            Ok(payload) => {
                last_error = Some(format!("unexpected health status {:?}", payload.status));
            }
            Err(e) => {
                last_error = Some(e.to_string());
            }
        }

        metrics::record_smoke_probe_latency(start);
        tokio::time::sleep(poll.interval).await;
    }

    Err(SmokeError::HealthTimeout {
        timeout_seconds: poll.timeout.as_secs(),
        last_error,
    })
}

/// Check that `/health` returns ok.
async fn check_health(client: &TargetClient, poll: &PollConfig) -> Result<(), SmokeError> {
    let payload = client.get_health(poll.request_timeout).await?;

    if payload.status != "ok" {
        return Err(SmokeError::CheckFailed {
            check: "health",
            reason: format!("expected status \"ok\", got {:?}", payload.status),
        });
    }

    Ok(())
}

/// Check `/info` metadata: service name and non-negative uptime.
async fn check_info(client: &TargetClient) -> Result<(), SmokeError> {
    let payload = client.get_info().await?;

    if payload.service != SERVICE_NAME {
        return Err(SmokeError::CheckFailed {
            check: "info",
            reason: format!(
                "expected service {:?}, got {:?}",
                SERVICE_NAME, payload.service
            ),
        });
    }

    if payload.uptime_seconds < 0.0 {
        return Err(SmokeError::CheckFailed {
            check: "info",
            reason: format!("negative uptime_seconds {}", payload.uptime_seconds),
        });
    }

    Ok(())
}

/// Check the `/echo` round trip.
async fn check_echo(client: &TargetClient) -> Result<(), SmokeError> {
    let payload = client.post_echo(ECHO_PROBE_MESSAGE).await?;

    if payload.echo != ECHO_PROBE_MESSAGE {
        return Err(SmokeError::CheckFailed {
            check: "echo",
            reason: format!(
                "expected echo {:?}, got {:?}",
                ECHO_PROBE_MESSAGE, payload.echo
            ),
        });
    }

    Ok(())
}

/// Wait for the target to become healthy, then run the acceptance checks.
///
/// Returns `Err` only when the target never comes up; individual check
/// failures are reported in the [`SmokeReport`] so all checks always run.
pub async fn run_checks(
    client: &TargetClient,
    poll: &PollConfig,
) -> Result<SmokeReport, SmokeError> {
    wait_for_healthy(client, poll).await?;

    let mut report = SmokeReport::default();

    let start = Instant::now();
    report.record("health", check_health(client, poll).await);
    metrics::record_smoke_check_latency(start, "health");

    let start = Instant::now();
    report.record("info", check_info(client).await);
    metrics::record_smoke_check_latency(start, "info");

    let start = Instant::now();
    report.record("echo", check_echo(client).await);
    metrics::record_smoke_check_latency(start, "echo");

    Ok(report)
}
