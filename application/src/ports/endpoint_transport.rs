//! Endpoint transport port
//!
//! Defines how a prompt reaches a single endpoint and how its answer comes
//! back.

use async_trait::async_trait;
use std::time::Duration;
use superbrain_domain::{Endpoint, FailureKind, Prompt};
use thiserror::Error;

/// Errors that can occur while querying one endpoint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
}

impl TransportError {
    /// The failure kind recorded for this error
    pub fn kind(&self) -> FailureKind {
        match self {
            TransportError::Connection(_) => FailureKind::Transport,
            TransportError::Status { code, .. } => FailureKind::Status(*code),
            TransportError::Decode(_) => FailureKind::Decode,
            TransportError::Timeout(_) => FailureKind::Timeout,
        }
    }
}

/// Transport for endpoint communication
///
/// Implementations send the prompt to `endpoint.target` and return the
/// `response` payload. Each call is one independent request; implementations
/// must not retry.
#[async_trait]
pub trait EndpointTransport: Send + Sync {
    async fn send(&self, endpoint: &Endpoint, prompt: &Prompt) -> Result<String, TransportError>;
}
