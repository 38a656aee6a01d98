use async_trait::async_trait;
use shopchat_logging::{log_failure, log_request, log_response};
use shopchat_types::GatewayReply;
use std::time::Duration;

use crate::client::Backend;
use crate::config::normalize_api_base;
use crate::error::GatewayError;

/// reqwest-backed client for the commerce backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
    verbose: bool,
}

impl HttpBackend {
    /// `timeout` of `None` leaves reqwest's default (no overall timeout).
    pub fn new(base_url: &str, timeout: Option<Duration>, verbose: bool) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: normalize_api_base(base_url),
            client,
            verbose,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Wake-up probe against `GET /`; returns the server's JSON status body.
    pub async fn ping(&self) -> Result<serde_json::Value, GatewayError> {
        let url = self.endpoint("/");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        log_response(status, &body, self.verbose);

        if !status.is_success() {
            return Err(GatewayError::Status { status: status.as_u16(), body });
        }

        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn post(&self, path: &str, payload: serde_json::Value) -> Result<GatewayReply, GatewayError> {
        let url = self.endpoint(path);
        log_request(&url, &payload, self.verbose);
        log::debug!("POST {}", url);

        let response = match self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log_failure(&url, &e, self.verbose);
                return Err(GatewayError::Transport(e.to_string()));
            }
        };

        let status = response.status();
        // An unreadable error body still reports the status
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if !status.is_success() => {
                log::debug!("Failed to read error body from {}: {}", url, e);
                String::new()
            }
            Err(e) => return Err(GatewayError::Transport(e.to_string())),
        };
        log_response(status, &body, self.verbose);

        if !status.is_success() {
            return Err(GatewayError::Status { status: status.as_u16(), body });
        }

        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}
