//! REPL (Read-Eval-Print Loop) for interactive multi-model chat

use crate::ConsoleFormatter;
use crate::ProgressReporter;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use superbrain_application::{AggregateQueryInput, AggregateQueryUseCase, EndpointTransport};
use superbrain_domain::{EndpointSet, Prompt};

const HISTORY_CAPACITY: usize = 500;

/// A slash command typed at the chat prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    Help,
    Endpoints,
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/endpoints" | "/models" => ReplCommand::Endpoints,
            other => ReplCommand::Unknown(other.to_string()),
        }
    }
}

/// Interactive chat REPL
///
/// Every submitted line is a fresh query; the previous result set is
/// discarded once the next one is printed.
pub struct ChatRepl<T: EndpointTransport + 'static> {
    use_case: AggregateQueryUseCase<T>,
    endpoints: EndpointSet,
    show_progress: bool,
    history_file: Option<PathBuf>,
}

impl<T: EndpointTransport + 'static> ChatRepl<T> {
    pub fn new(use_case: AggregateQueryUseCase<T>, endpoints: EndpointSet) -> Self {
        Self {
            use_case,
            endpoints,
            show_progress: true,
            history_file: None,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Use `path` for line history instead of the per-user data directory
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("superbrain").join("history.txt")))
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> std::io::Result<()> {
        let mut editor = Reedline::create();

        if let Some(path) = self.history_path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(history) = FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
                editor = editor.with_history(Box::new(history));
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("superbrain".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();

                    if line.starts_with('/') {
                        if self.handle_command(ReplCommand::parse(line)) {
                            break;
                        }
                        continue;
                    }

                    // Blank submissions are ignored
                    if let Some(prompt) = Prompt::try_new(line) {
                        self.process_prompt(prompt).await;
                    }
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                _ => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│        SuperBrain - Multi-Model Chat        │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Endpoints: {}", self.endpoint_names());
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /endpoints        - Show current endpoints");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    fn endpoint_names(&self) -> String {
        self.endpoints
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                true
            }
            ReplCommand::Help => {
                println!();
                Self::print_help();
                false
            }
            ReplCommand::Endpoints => {
                println!();
                println!("Current endpoints:");
                for endpoint in &self.endpoints {
                    println!("  - {} ({}) -> {}", endpoint.name, endpoint.id, endpoint.target);
                }
                println!();
                false
            }
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }

    async fn process_prompt(&self, prompt: Prompt) {
        println!();

        let input = AggregateQueryInput::new(prompt.clone(), self.endpoints.clone());

        let results = if self.show_progress {
            let progress = ProgressReporter::new();
            self.use_case.execute_with_progress(input, &progress).await
        } else {
            self.use_case.execute(input).await
        };

        println!(
            "{}",
            ConsoleFormatter::format(&prompt, &self.endpoints, &results)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use superbrain_application::TransportError;
    use superbrain_domain::Endpoint;

    struct Silent;

    #[async_trait]
    impl EndpointTransport for Silent {
        async fn send(&self, _: &Endpoint, _: &Prompt) -> Result<String, TransportError> {
            Ok(String::new())
        }
    }

    fn repl() -> ChatRepl<Silent> {
        let endpoints = EndpointSet::new(Endpoint::default_endpoints()).unwrap();
        ChatRepl::new(AggregateQueryUseCase::new(Arc::new(Silent)), endpoints)
    }

    #[test]
    fn test_history_file_override() {
        let repl = repl()
            .with_progress(false)
            .with_history_file(Some(PathBuf::from("/tmp/sb-history.txt")));

        assert!(!repl.show_progress);
        assert_eq!(repl.history_path(), Some(PathBuf::from("/tmp/sb-history.txt")));
    }

    #[test]
    fn test_history_defaults_to_data_dir() {
        let repl = repl();
        assert!(repl.show_progress);
        if let Some(path) = repl.history_path() {
            assert!(path.ends_with("superbrain/history.txt"));
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("/quit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse(" /q "), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/?"), ReplCommand::Help);
        assert_eq!(ReplCommand::parse("/models"), ReplCommand::Endpoints);
        assert_eq!(
            ReplCommand::parse("/reset"),
            ReplCommand::Unknown("/reset".to_string())
        );
    }
}
