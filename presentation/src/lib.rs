//! Presentation layer for superbrain
//!
//! This crate contains CLI definitions, the per-endpoint panel formatter,
//! progress reporters, the assistant dashboard and the interactive chat loop.

pub mod chat;
pub mod cli;
pub mod dashboard;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::{Cli, OutputFormat};
pub use dashboard::Dashboard;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
