//! Domain layer for superbrain
//!
//! This crate contains the core entities and value objects of a multi-model
//! query. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Endpoint**: a named remote model backend the prompt is sent to
//! - **Prompt**: the validated text shared unmodified by every endpoint
//! - **Outcome**: the settled result of one endpoint's request
//! - **ResultSet**: one outcome per endpoint for a single submission

pub mod core;
pub mod query;

// Re-export commonly used types
pub use core::{
    endpoint::{Endpoint, EndpointId, EndpointSet},
    error::DomainError,
    prompt::Prompt,
    string::preview,
};
pub use query::{
    outcome::{Failure, FailureKind, Outcome},
    result_set::{OutcomeEvent, ResultSet},
};
