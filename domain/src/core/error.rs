//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are raised while building the inputs of a query, never while the
/// query itself runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error("No endpoints configured")]
    NoEndpoints,

    #[error("Duplicate endpoint: {0}")]
    DuplicateEndpoint(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),
}
