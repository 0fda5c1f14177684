//! Application layer for superbrain
//!
//! This crate contains the multi-model query use case, the ports it drives,
//! and the query policy. It depends only on the domain layer.

pub mod policy;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use policy::QueryPolicy;
pub use ports::{
    endpoint_transport::{EndpointTransport, TransportError},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::aggregate_query::{AggregateQueryInput, AggregateQueryUseCase, OutcomeStream};
