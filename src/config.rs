//! Application configuration loaded from environment variables.

use serde::Deserialize;
use url::Url;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Service Configuration ===
    /// Environment label reported by `/info` (APP_ENV).
    #[serde(default = "default_app_env")]
    pub app_env: String,

    /// HTTP listen port for the target service.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,

    // === Metrics Configuration ===
    /// Install the Prometheus recorder and exporter.
    #[serde(default)]
    pub metrics_enabled: bool,

    /// Prometheus exporter listen port.
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    // === Smoke Probe Configuration ===
    /// Base URL the smoke probe targets.
    #[serde(default = "default_smoke_base_url")]
    pub smoke_base_url: String,

    /// Seconds to wait for the target to become healthy.
    #[serde(default = "default_smoke_timeout")]
    pub smoke_timeout_seconds: u64,

    /// Milliseconds between health polls.
    #[serde(default = "default_smoke_interval")]
    pub smoke_interval_ms: u64,

    /// Per-request timeout for smoke checks, in milliseconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_ms: u64,
}

fn default_app_env() -> String {
    "local".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_smoke_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_smoke_timeout() -> u64 {
    30
}

fn default_smoke_interval() -> u64 {
    1000
}

fn default_http_timeout() -> u64 {
    5000
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.smoke_timeout_seconds == 0 {
            return Err("SMOKE_TIMEOUT_SECONDS must be greater than 0".to_string());
        }

        if self.smoke_interval_ms == 0 {
            return Err("SMOKE_INTERVAL_MS must be greater than 0".to_string());
        }

        if self.http_timeout_ms == 0 {
            return Err("HTTP_TIMEOUT_MS must be greater than 0".to_string());
        }

        let url = Url::parse(&self.smoke_base_url)
            .map_err(|e| format!("SMOKE_BASE_URL is not a valid URL: {}", e))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!(
                "SMOKE_BASE_URL must use http or https, got {}",
                url.scheme()
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_env: default_app_env(),
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
            metrics_enabled: false,
            metrics_port: default_metrics_port(),
            smoke_base_url: default_smoke_base_url(),
            smoke_timeout_seconds: default_smoke_timeout(),
            smoke_interval_ms: default_smoke_interval(),
            http_timeout_ms: default_http_timeout(),
        }
    }
}
