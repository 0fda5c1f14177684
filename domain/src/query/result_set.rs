//! ResultSet - the outcomes of one submission, keyed by endpoint

use super::outcome::{Failure, Outcome};
use crate::core::endpoint::{Endpoint, EndpointId, EndpointSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One settled endpoint, emitted as soon as its request completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeEvent {
    pub endpoint: EndpointId,
    pub outcome: Outcome,
}

impl OutcomeEvent {
    pub fn new(endpoint: EndpointId, outcome: Outcome) -> Self {
        Self { endpoint, outcome }
    }
}

/// Mapping from endpoint identifier to its outcome
///
/// Each slot is written at most once: a second `record` for the same
/// endpoint is ignored. The map is keyed, not ordered by completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    outcomes: BTreeMap<EndpointId, Outcome>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the outcome for `endpoint`. Returns `false` if the slot was
    /// already filled, in which case the first outcome is kept.
    pub fn record(&mut self, endpoint: EndpointId, outcome: Outcome) -> bool {
        if self.outcomes.contains_key(&endpoint) {
            return false;
        }
        self.outcomes.insert(endpoint, outcome);
        true
    }

    pub fn record_event(&mut self, event: OutcomeEvent) -> bool {
        self.record(event.endpoint, event.outcome)
    }

    pub fn get(&self, endpoint: &str) -> Option<&Outcome> {
        self.outcomes.get(&EndpointId::new(endpoint))
    }

    pub fn contains(&self, endpoint: &EndpointId) -> bool {
        self.outcomes.contains_key(endpoint)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EndpointId, &Outcome)> {
        self.outcomes.iter()
    }

    /// Successful payloads, keyed by endpoint
    pub fn successes(&self) -> impl Iterator<Item = (&EndpointId, &str)> {
        self.outcomes
            .iter()
            .filter_map(|(id, outcome)| outcome.payload().map(|p| (id, p)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&EndpointId, &Failure)> {
        self.outcomes
            .iter()
            .filter_map(|(id, outcome)| outcome.as_failure().map(|f| (id, f)))
    }

    /// Endpoints of `set` that have no outcome yet
    pub fn missing<'a>(&self, set: &'a EndpointSet) -> Vec<&'a Endpoint> {
        set.iter().filter(|e| !self.contains(&e.id)).collect()
    }
}
