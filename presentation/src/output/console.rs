//! Console output formatter for query results

use colored::Colorize;
use serde::Serialize;
use superbrain_domain::{Endpoint, EndpointSet, Outcome, Prompt, ResultSet};

/// Shown in a panel whose endpoint has not answered
pub const NO_RESPONSE: &str = "No response yet";

#[derive(Serialize)]
struct JsonReport<'a> {
    prompt: &'a str,
    results: &'a ResultSet,
}

/// Formats query results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format every endpoint as a panel, in endpoint order
    pub fn format(prompt: &Prompt, endpoints: &EndpointSet, results: &ResultSet) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Multi-Model Query"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Prompt:".cyan().bold(),
            prompt.content()
        ));

        let succeeded = results.successes().count();
        output.push_str(&format!(
            "{} {}/{} answered\n",
            "Endpoints:".cyan().bold(),
            succeeded,
            endpoints.len()
        ));

        for endpoint in endpoints {
            output.push_str(&Self::format_panel(
                endpoint,
                results.get(endpoint.id.as_str()),
            ));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format one endpoint's panel
    ///
    /// `None` renders the idle state used before the endpoint settles.
    pub fn format_panel(endpoint: &Endpoint, outcome: Option<&Outcome>) -> String {
        let title = format!("── {} ──", endpoint.name);
        match outcome {
            Some(Outcome::Success { payload }) => {
                format!("\n{}\n{}\n", title.yellow().bold(), payload)
            }
            Some(failure @ Outcome::Failure(_)) => {
                format!("\n{}\n{}\n", title.red().bold(), failure.display_text())
            }
            None => format!("\n{}\n{}\n", title.bold(), NO_RESPONSE.dimmed()),
        }
    }

    /// Format as JSON
    pub fn format_json(prompt: &Prompt, results: &ResultSet) -> String {
        let report = JsonReport {
            prompt: prompt.content(),
            results,
        };
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use superbrain_domain::FailureKind;

    fn fixture() -> (Prompt, EndpointSet, ResultSet) {
        colored::control::set_override(false);

        let endpoints = EndpointSet::new(vec![
            Endpoint::api("openai", "OpenAI"),
            Endpoint::api("claude", "Claude"),
            Endpoint::api("venice", "Venice"),
        ])
        .unwrap();

        let mut results = ResultSet::new();
        results.record("openai".into(), Outcome::success("Ownership is..."));
        results.record(
            "claude".into(),
            Outcome::failure(FailureKind::Status(500), "Claude API error: HTTP 500: boom"),
        );

        (Prompt::try_new("Explain ownership").unwrap(), endpoints, results)
    }

    #[test]
    fn test_panels_in_endpoint_order() {
        let (prompt, endpoints, results) = fixture();
        let output = ConsoleFormatter::format(&prompt, &endpoints, &results);

        let openai = output.find("── OpenAI ──").unwrap();
        let claude = output.find("── Claude ──").unwrap();
        let venice = output.find("── Venice ──").unwrap();
        assert!(openai < claude && claude < venice);

        assert!(output.contains("Explain ownership"));
        assert!(output.contains("1/3 answered"));
        assert!(output.contains("Ownership is..."));
        assert!(output.contains("Error: Claude API error: HTTP 500: boom"));
    }

    #[test]
    fn test_missing_outcome_shows_idle_text() {
        let (prompt, endpoints, results) = fixture();
        let output = ConsoleFormatter::format(&prompt, &endpoints, &results);

        let venice = output.find("── Venice ──").unwrap();
        assert!(output[venice..].contains(NO_RESPONSE));
    }

    #[test]
    fn test_json_output() {
        let (prompt, _, results) = fixture();
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&prompt, &results)).unwrap();

        assert_eq!(json["prompt"], "Explain ownership");
        assert_eq!(json["results"]["openai"]["status"], "success");
        assert_eq!(json["results"]["claude"]["status"], "failure");
        assert!(json["results"].get("venice").is_none());
    }
}
