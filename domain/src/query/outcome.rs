//! Per-endpoint outcome of a query

use serde::{Deserialize, Serialize};

/// Why an endpoint failed to produce a payload
///
/// Callers can branch on the kind instead of matching on reason text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection or network failure
    Transport,
    /// Non-success HTTP status
    Status(u16),
    /// Response body did not have the expected shape
    Decode,
    /// The caller-supplied deadline elapsed
    Timeout,
    /// The request task ended without reporting (e.g. it panicked)
    Internal,
}

/// A failed endpoint request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    /// Human-readable explanation, shown as-is in the endpoint's panel
    pub reason: String,
}

impl Failure {
    pub fn new(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

/// The settled result of one endpoint's request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success { payload: String },
    Failure(Failure),
}

impl Outcome {
    pub fn success(payload: impl Into<String>) -> Self {
        Outcome::Success {
            payload: payload.into(),
        }
    }

    pub fn failure(kind: FailureKind, reason: impl Into<String>) -> Self {
        Outcome::Failure(Failure::new(kind, reason))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            Outcome::Success { payload } => Some(payload),
            Outcome::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure(failure) => Some(failure),
        }
    }

    /// Text shown in the endpoint's panel
    pub fn display_text(&self) -> String {
        match self {
            Outcome::Success { payload } => payload.clone(),
            Outcome::Failure(failure) => format!("Error: {}", failure.reason),
        }
    }
}
