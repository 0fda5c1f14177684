//! Core domain concepts shared across the query subdomain.
//!
//! - [`endpoint::Endpoint`] - a named remote model backend
//! - [`prompt::Prompt`] - a validated prompt to fan out
//! - [`error::DomainError`] - domain-level errors

pub mod endpoint;
pub mod error;
pub mod prompt;
pub mod string;
