//! Configuration file loading for superbrain
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SUPERBRAIN_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./superbrain.toml` or `./.superbrain.toml`
//! 4. Global: `$XDG_CONFIG_HOME/superbrain/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileEndpointConfig, FileLoggingConfig, FileOutputConfig,
    FileOutputFormat, FileQueryConfig, FileReplConfig, FileServerConfig,
};
pub use loader::ConfigLoader;
