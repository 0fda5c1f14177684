//! JSON wire types for endpoint requests

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    pub response: String,
}

/// Pull a provider error message out of a failed response body.
///
/// Understands `{"error": {"message": "..."}}`, `{"error": "..."}` and
/// `{"message": "..."}`.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let message = match value.get("error") {
        Some(serde_json::Value::String(s)) => Some(s.as_str()),
        Some(error) => error.get("message").and_then(|m| m.as_str()),
        None => value.get("message").and_then(|m| m.as_str()),
    }?;

    let message = message.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}
