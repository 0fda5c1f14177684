//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One panel per endpoint
    Panels,
    /// JSON output
    Json,
}

/// CLI arguments for superbrain
#[derive(Parser, Debug)]
#[command(name = "superbrain")]
#[command(author, version, about = "Ask several LLM endpoints the same question at once")]
#[command(long_about = r#"
SuperBrain sends one prompt to several model endpoints in parallel and shows
every answer side by side. A slow or failing endpoint never hides the others.

Each endpoint receives `POST <target>` with `{"prompt": "..."}` and must
answer `{"response": "..."}`. Relative targets such as /api/openai are
resolved against --base-url.

Configuration files are loaded from (in priority order):
1. SUPERBRAIN_* environment variables
2. --config <path>     Explicit config file
3. ./superbrain.toml   Project-level config
4. ~/.config/superbrain/config.toml   Global config

Example:
  superbrain "Explain ownership in Rust"
  superbrain -e openai -e claude "Compare async runtimes"
  superbrain --stream -o json "Summarize RFC 9110"
  superbrain --chat
"#)]
pub struct Cli {
    /// The prompt to send (not required in chat mode)
    pub prompt: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Endpoints to query by id (can be specified multiple times)
    #[arg(short = 'e', long = "endpoint", value_name = "ID")]
    pub endpoints: Vec<String>,

    /// Base URL for relative endpoint targets
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Per-endpoint deadline in seconds
    #[arg(short, long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Print each answer as soon as its endpoint settles
    #[arg(long)]
    pub stream: bool,

    /// List the available assistants and exit
    #[arg(long)]
    pub list: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Directory for rolling log files
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
