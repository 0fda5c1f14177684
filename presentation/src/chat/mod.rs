//! Interactive chat module
//!
//! Provides a line-editor based chat loop where every submitted line is
//! sent to all configured endpoints.

mod repl;

pub use repl::{ChatRepl, ReplCommand};
