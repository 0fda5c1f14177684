//! Progress reporting for multi-endpoint queries

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use superbrain_application::ProgressNotifier;
use superbrain_domain::{Endpoint, EndpointSet, Outcome, ResultSet};

/// Reports progress with a single bar that advances as endpoints settle
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_query_start(&self, endpoints: &EndpointSet) {
        let pb = ProgressBar::new(endpoints.len() as u64);
        pb.set_style(Self::bar_style());
        pb.set_prefix("Querying models");
        pb.set_message("Waiting...");
        pb.enable_steady_tick(std::time::Duration::from_millis(120));

        *self.bar.lock().unwrap() = Some(pb);
    }

    fn on_endpoint_settled(&self, endpoint: &Endpoint, outcome: &Outcome) {
        if let Some(pb) = self.bar.lock().unwrap().as_ref() {
            let status = if outcome.is_success() {
                format!("{} {}", "v".green(), endpoint.name)
            } else {
                format!("{} {}", "x".red(), endpoint.name)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_query_complete(&self, results: &ResultSet) {
        if let Some(pb) = self.bar.lock().unwrap().take() {
            let failed = results.failures().count();
            let message = if failed == 0 {
                "all answered".green().to_string()
            } else {
                format!("{} failed", failed).yellow().to_string()
            };
            pb.finish_and_clear();
            eprintln!("{} {}", "Done:".bold(), message);
        }
    }
}

/// Simple text-based progress on stderr (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_query_start(&self, endpoints: &EndpointSet) {
        eprintln!(
            "{} {} ({} endpoints)",
            "->".cyan(),
            "Querying models".bold(),
            endpoints.len()
        );
    }

    fn on_endpoint_settled(&self, endpoint: &Endpoint, outcome: &Outcome) {
        if outcome.is_success() {
            eprintln!("  {} {}", "v".green(), endpoint.name);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), endpoint.name);
        }
    }

    fn on_query_complete(&self, _results: &ResultSet) {
        eprintln!();
    }
}
