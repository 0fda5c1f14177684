//! Progress notification port
//!
//! Defines the interface for reporting progress while a query fans out.

use superbrain_domain::{Endpoint, EndpointSet, Outcome, ResultSet};

/// Callback for progress updates during a multi-endpoint query
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bar, plain text, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once, before any request is issued
    fn on_query_start(&self, endpoints: &EndpointSet);

    /// Called as each endpoint settles, in completion order
    fn on_endpoint_settled(&self, endpoint: &Endpoint, outcome: &Outcome);

    /// Called after every endpoint has an outcome
    fn on_query_complete(&self, _results: &ResultSet) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_query_start(&self, _endpoints: &EndpointSet) {}
    fn on_endpoint_settled(&self, _endpoint: &Endpoint, _outcome: &Outcome) {}
}
