//! Unified error types for the target service and smoke probe.

use thiserror::Error;

/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum TargetError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Smoke probe error.
    #[error("smoke error: {0}")]
    Smoke(#[from] SmokeError),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Smoke probe and check errors.
#[derive(Error, Debug)]
pub enum SmokeError {
    /// Target never became healthy within the deadline.
    #[error("target did not become healthy within {timeout_seconds}s")]
    HealthTimeout {
        /// Deadline that expired.
        timeout_seconds: u64,
        /// Last transport error observed while polling, if any.
        last_error: Option<String>,
    },

    /// Endpoint returned an unexpected HTTP status.
    #[error("{endpoint} returned HTTP {status}")]
    UnexpectedStatus {
        /// Endpoint path that failed.
        endpoint: String,
        /// Status code received.
        status: u16,
    },

    /// Response body did not match the expected payload.
    #[error("{check} check failed: {reason}")]
    CheckFailed {
        /// Name of the failing check.
        check: &'static str,
        /// What the response got wrong.
        reason: String,
    },

    /// Invalid probe target URL.
    #[error("invalid base url {url}: {reason}")]
    InvalidBaseUrl {
        /// The offending URL string.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, TargetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_timeout_message_names_deadline() {
        let err = SmokeError::HealthTimeout {
            timeout_seconds: 30,
            last_error: Some("connection refused".to_string()),
        };

        assert_eq!(err.to_string(), "target did not become healthy within 30s");
    }

    #[test]
    fn check_failed_message_names_check() {
        let err = SmokeError::CheckFailed {
            check: "info",
            reason: "service mismatch".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("info"));
        assert!(msg.contains("service mismatch"));
    }
}
