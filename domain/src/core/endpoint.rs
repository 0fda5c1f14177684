//! Endpoint value objects

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifier of an endpoint (Value Object)
///
/// Identifiers key the [`ResultSet`](crate::ResultSet), so they are ordered
/// and hashable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointId(String);

impl EndpointId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EndpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EndpointId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EndpointId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A named remote model backend (Value Object)
///
/// `target` is either an absolute URL or a path such as `/api/openai`
/// that the transport resolves against its base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: EndpointId,
    pub name: String,
    pub target: String,
}

impl Endpoint {
    pub fn new(
        id: impl Into<EndpointId>,
        name: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            target: target.into(),
        }
    }

    /// Endpoint served by the model backend at `POST /api/{id}`
    pub fn api(id: &str, name: &str) -> Self {
        Self::new(id, name, format!("/api/{}", id))
    }

    /// The endpoints queried by default on the multi-model page
    pub fn default_endpoints() -> Vec<Endpoint> {
        vec![
            Endpoint::api("openai", "OpenAI"),
            Endpoint::api("claude", "Claude"),
            Endpoint::api("gemini", "Gemini"),
            Endpoint::api("groq", "Groq"),
            Endpoint::api("venice", "Venice"),
        ]
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.id.as_str().trim().is_empty() {
            return Err(DomainError::InvalidEndpoint("id cannot be empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidEndpoint(format!(
                "{}: name cannot be empty",
                self.id
            )));
        }
        if self.target.trim().is_empty() {
            return Err(DomainError::InvalidEndpoint(format!(
                "{}: target cannot be empty",
                self.id
            )));
        }
        Ok(())
    }
}

/// A non-empty, duplicate-free list of endpoints
///
/// Order is preserved so presenters can lay out one panel per endpoint in
/// the configured order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EndpointSet {
    endpoints: Vec<Endpoint>,
}

impl EndpointSet {
    pub fn new(endpoints: Vec<Endpoint>) -> Result<Self, DomainError> {
        if endpoints.is_empty() {
            return Err(DomainError::NoEndpoints);
        }

        let mut seen = HashSet::new();
        for endpoint in &endpoints {
            endpoint.validate()?;
            if !seen.insert(endpoint.id.clone()) {
                return Err(DomainError::DuplicateEndpoint(endpoint.id.to_string()));
            }
        }

        Ok(Self { endpoints })
    }

    /// Keep only the endpoints named in `ids`, in the order they are listed
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> Result<Self, DomainError> {
        let selected = ids
            .iter()
            .map(|id| {
                let id = id.as_ref();
                self.get(id)
                    .cloned()
                    .ok_or_else(|| DomainError::UnknownEndpoint(id.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(selected)
    }

    pub fn get(&self, id: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.id.as_str() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &EndpointId> {
        self.endpoints.iter().map(|e| &e.id)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Always `false`; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl<'a> IntoIterator for &'a EndpointSet {
    type Item = &'a Endpoint;
    type IntoIter = std::slice::Iter<'a, Endpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.endpoints.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints_are_valid() {
        let set = EndpointSet::new(Endpoint::default_endpoints()).unwrap();
        assert_eq!(set.len(), 5);
        assert_eq!(set.get("groq").unwrap().target, "/api/groq");
    }

    #[test]
    fn test_empty_set_rejected() {
        assert_eq!(EndpointSet::new(vec![]), Err(DomainError::NoEndpoints));
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = EndpointSet::new(vec![
            Endpoint::api("openai", "OpenAI"),
            Endpoint::new("openai", "Other", "http://localhost:9000/x"),
        ]);
        assert_eq!(
            result,
            Err(DomainError::DuplicateEndpoint("openai".to_string()))
        );
    }

    #[test]
    fn test_blank_fields_rejected() {
        let result = EndpointSet::new(vec![Endpoint::new("local", " ", "/api/local")]);
        assert!(matches!(result, Err(DomainError::InvalidEndpoint(_))));

        let result = EndpointSet::new(vec![Endpoint::new("", "Local", "/api/local")]);
        assert!(matches!(result, Err(DomainError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_select_preserves_requested_order() {
        let set = EndpointSet::new(Endpoint::default_endpoints()).unwrap();
        let subset = set.select(&["venice", "claude"]).unwrap();
        let ids: Vec<_> = subset.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["venice", "claude"]);
    }

    #[test]
    fn test_select_unknown() {
        let set = EndpointSet::new(Endpoint::default_endpoints()).unwrap();
        assert_eq!(
            set.select(&["mistral"]),
            Err(DomainError::UnknownEndpoint("mistral".to_string()))
        );
    }
}
