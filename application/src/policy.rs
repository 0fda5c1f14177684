//! Per-submission query policy

use std::time::Duration;

/// How long a single endpoint request may run
///
/// Each endpoint is queried exactly once per submission. Without a timeout a
/// request runs until the transport gives up on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryPolicy {
    pub timeout: Option<Duration>,
}

impl QueryPolicy {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    /// Policy for a `timeout_seconds` setting from the CLI or config file
    pub fn from_timeout_seconds(seconds: Option<u64>) -> Self {
        seconds
            .map(|s| Self::with_timeout(Duration::from_secs(s)))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_timeout_seconds() {
        assert_eq!(QueryPolicy::from_timeout_seconds(None), QueryPolicy::default());
        assert_eq!(
            QueryPolicy::from_timeout_seconds(Some(30)).timeout,
            Some(Duration::from_secs(30))
        );
    }
}
