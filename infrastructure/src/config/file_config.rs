//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain types on demand.
//!
//! ```toml
//! [server]
//! base_url = "http://localhost:8000"
//!
//! [query]
//! timeout_seconds = 60
//!
//! [[endpoints]]
//! id = "openai"
//! name = "OpenAI"
//! target = "/api/openai"
//!
//! [[endpoints]]
//! id = "local-llm"
//! name = "Local LLM"
//! target = "http://localhost:11434/api/superbrain"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use superbrain_domain::{DomainError, Endpoint, EndpointSet};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("endpoint {index}: {field} cannot be empty")]
    EmptyEndpointField { index: usize, field: &'static str },

    #[error("endpoint id '{0}' is defined more than once")]
    DuplicateEndpoint(String),

    #[error("server.base_url cannot be empty")]
    EmptyBaseUrl,
}

/// Raw server configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Base URL that relative endpoint targets are resolved against
    pub base_url: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

/// Raw query configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQueryConfig {
    /// Per-endpoint deadline in seconds
    pub timeout_seconds: Option<u64>,
}

/// One `[[endpoints]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEndpointConfig {
    pub id: String,
    pub name: String,
    pub target: String,
}

impl From<&FileEndpointConfig> for Endpoint {
    fn from(raw: &FileEndpointConfig) -> Self {
        Endpoint::new(raw.id.as_str(), raw.name.as_str(), raw.target.as_str())
    }
}

/// Output format for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOutputFormat {
    Panels,
    Json,
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    pub format: Option<FileOutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show progress indicators
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<String>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for daily rolling log files; console only when unset
    pub dir: Option<String>,
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: FileServerConfig,
    pub query: FileQueryConfig,
    /// Endpoints to query; the built-in set when empty
    pub endpoints: Vec<FileEndpointConfig>,
    pub output: FileOutputConfig,
    pub repl: FileReplConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.query.timeout_seconds == Some(0) {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if self.server.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }

        let mut seen = HashSet::new();
        for (index, endpoint) in self.endpoints.iter().enumerate() {
            for (field, value) in [
                ("id", &endpoint.id),
                ("name", &endpoint.name),
                ("target", &endpoint.target),
            ] {
                if value.trim().is_empty() {
                    return Err(ConfigValidationError::EmptyEndpointField { index, field });
                }
            }
            if !seen.insert(endpoint.id.as_str()) {
                return Err(ConfigValidationError::DuplicateEndpoint(endpoint.id.clone()));
            }
        }

        Ok(())
    }

    /// Endpoints to query, falling back to the built-in set
    pub fn endpoint_set(&self) -> Result<EndpointSet, DomainError> {
        if self.endpoints.is_empty() {
            return EndpointSet::new(Endpoint::default_endpoints());
        }
        EndpointSet::new(self.endpoints.iter().map(Endpoint::from).collect())
    }
}
