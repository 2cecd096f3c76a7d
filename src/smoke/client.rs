//! HTTP client for the target service.

use std::time::Duration;

use tracing::{debug, instrument};
use url::Url;

use crate::api::handlers::{EchoRequest, EchoResponse, InfoResponse};
use crate::error::SmokeError;

/// Client for the target service endpoints.
#[derive(Debug, Clone)]
pub struct TargetClient {
    /// HTTP client for probe requests.
    http: reqwest::Client,
    /// Base URL of the target service.
    base_url: Url,
}

/// Health response payload.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct HealthPayload {
    /// Reported status string.
    pub status: String,
}

impl TargetClient {
    /// Create a new client for the given base URL.
    ///
    /// `request_timeout` bounds every individual request; the health poll
    /// loop applies its own shorter per-poll timeout on top.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, SmokeError> {
        let base_url = Url::parse(base_url).map_err(|e| SmokeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(SmokeError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme {}", base_url.scheme()),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_millis(500))
            .tcp_nodelay(true)
            .pool_max_idle_per_host(4)
            .build()
            .map_err(SmokeError::HttpError)?;

        Ok(Self { http, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }

    /// Fetch `/health` with an explicit per-request timeout.
    #[instrument(skip(self))]
    pub async fn get_health(&self, timeout: Duration) -> Result<HealthPayload, SmokeError> {
        let url = self.endpoint("/health");

        let response = self.http.get(url).timeout(timeout).send().await?;

        if !response.status().is_success() {
            return Err(SmokeError::UnexpectedStatus {
                endpoint: "/health".to_string(),
                status: response.status().as_u16(),
            });
        }

        let payload: HealthPayload = response.json().await?;
        debug!(status = %payload.status, "Health response received");

        Ok(payload)
    }

    /// Fetch `/info`.
    #[instrument(skip(self))]
    pub async fn get_info(&self) -> Result<InfoResponse, SmokeError> {
        let url = self.endpoint("/info");

        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(SmokeError::UnexpectedStatus {
                endpoint: "/info".to_string(),
                status: response.status().as_u16(),
            });
        }

        let payload: InfoResponse = response.json().await?;
        debug!(service = %payload.service, uptime = payload.uptime_seconds, "Info response received");

        Ok(payload)
    }

    /// Post a message to `/echo` and return the echoed payload.
    #[instrument(skip(self))]
    pub async fn post_echo(&self, message: &str) -> Result<EchoResponse, SmokeError> {
        let url = self.endpoint("/echo");

        let response = self
            .http
            .post(url)
            .json(&EchoRequest {
                message: message.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SmokeError::UnexpectedStatus {
                endpoint: "/echo".to_string(),
                status: response.status().as_u16(),
            });
        }

        let payload: EchoResponse = response.json().await?;

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn client_rejects_invalid_base_url() {
        let result = TargetClient::new("not a url", Duration::from_secs(5));
        assert!(matches!(result, Err(SmokeError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn client_rejects_non_http_scheme() {
        let result = TargetClient::new("ftp://localhost:8080", Duration::from_secs(5));
        assert!(matches!(result, Err(SmokeError::InvalidBaseUrl { .. })));
    }

    fn base_url(server: &MockServer) -> String {
        format!("http://{}", server.address())
    }

    #[tokio::test]
    async fn get_health_parses_ok_payload() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"status": "ok"}));
        });

        let client = TargetClient::new(&base_url(&server), Duration::from_secs(5)).unwrap();
        let payload = client.get_health(Duration::from_secs(2)).await.unwrap();

        assert_eq!(payload.status, "ok");
        mock.assert();
    }

    #[tokio::test]
    async fn get_health_surfaces_server_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(500);
        });

        let client = TargetClient::new(&base_url(&server), Duration::from_secs(5)).unwrap();
        let result = client.get_health(Duration::from_secs(2)).await;

        assert!(matches!(
            result,
            Err(SmokeError::UnexpectedStatus { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn post_echo_round_trips_message() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/echo")
                .json_body(serde_json::json!({"message": "hello-orchestrator"}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"echo": "hello-orchestrator"}));
        });

        let client = TargetClient::new(&base_url(&server), Duration::from_secs(5)).unwrap();
        let payload = client.post_echo("hello-orchestrator").await.unwrap();

        assert_eq!(payload.echo, "hello-orchestrator");
        mock.assert();
    }
}
