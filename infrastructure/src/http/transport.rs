//! reqwest-backed endpoint transport

use super::wire::{self, QueryRequest, QueryResponse};
use async_trait::async_trait;
use reqwest::Url;
use superbrain_application::{EndpointTransport, TransportError};
use superbrain_domain::{Endpoint, Prompt};
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = concat!("superbrain/", env!("CARGO_PKG_VERSION"));

/// Errors raised while building the transport
#[derive(Error, Debug)]
pub enum HttpSetupError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Sends prompts to endpoints over HTTP
///
/// Endpoint targets that are absolute URLs are used as-is; paths such as
/// `/api/openai` are resolved against the base URL. One shared
/// `reqwest::Client` serves every endpoint so connections are pooled.
#[derive(Debug, Clone)]
pub struct HttpEndpointTransport {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl HttpEndpointTransport {
    pub fn new() -> Result<Self, HttpSetupError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: None,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, HttpSetupError> {
        let url = Url::parse(base_url).map_err(|e| HttpSetupError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        self.base_url = Some(url);
        Ok(self)
    }

    fn resolve(&self, endpoint: &Endpoint) -> Result<Url, TransportError> {
        if let Ok(url) = Url::parse(&endpoint.target) {
            return Ok(url);
        }

        let base = self.base_url.as_ref().ok_or_else(|| {
            TransportError::Connection(format!(
                "relative target '{}' requires a base URL",
                endpoint.target
            ))
        })?;

        base.join(&endpoint.target).map_err(|e| {
            TransportError::Connection(format!("invalid target '{}': {}", endpoint.target, e))
        })
    }
}

#[async_trait]
impl EndpointTransport for HttpEndpointTransport {
    async fn send(&self, endpoint: &Endpoint, prompt: &Prompt) -> Result<String, TransportError> {
        let url = self.resolve(endpoint)?;
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(&QueryRequest {
                prompt: prompt.content(),
            })
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        if !status.is_success() {
            let message = wire::error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
            return Err(TransportError::Status {
                code: status.as_u16(),
                message,
            });
        }

        let decoded: QueryResponse =
            serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))?;
        Ok(decoded.response)
    }
}
