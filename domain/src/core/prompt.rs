//! Prompt value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A prompt to be sent to every endpoint (Value Object)
///
/// A prompt is never empty or whitespace-only. Callers that accept free-form
/// input use [`Prompt::try_new`] and simply ignore blank submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Prompt {
    content: String,
}

impl Prompt {
    /// Try to create a new prompt, returning None if blank
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self { content })
        }
    }

    /// Get the prompt content
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for Prompt {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Prompt::try_new(s).ok_or(DomainError::EmptyPrompt)
    }
}

impl TryFrom<&str> for Prompt {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Prompt::try_new(s).ok_or(DomainError::EmptyPrompt)
    }
}

impl From<Prompt> for String {
    fn from(p: Prompt) -> Self {
        p.content
    }
}
