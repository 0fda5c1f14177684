//! CLI entrypoint for SuperBrain
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::collections::HashSet;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use superbrain_application::{AggregateQueryInput, AggregateQueryUseCase, QueryPolicy};
use superbrain_domain::{EndpointId, EndpointSet, Prompt, ResultSet};
use superbrain_infrastructure::{ConfigLoader, FileOutputFormat, HttpEndpointTransport};
use superbrain_presentation::{
    ChatRepl, Cli, ConsoleFormatter, Dashboard, OutputFormat, ProgressReporter, SimpleProgress,
};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    let log_dir = cli
        .log_dir
        .clone()
        .or_else(|| config.logging.dir.as_ref().map(PathBuf::from));
    let _log_guard = init_logging(cli.verbose, log_dir.as_deref());

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting SuperBrain");

    let all_endpoints = config.endpoint_set()?;

    if cli.list {
        print!("{}", Dashboard::format(&all_endpoints));
        return Ok(());
    }

    let endpoints = if cli.endpoints.is_empty() {
        all_endpoints
    } else {
        all_endpoints.select(cli.endpoints.as_slice())?
    };

    if cli.timeout == Some(0) {
        bail!("--timeout must be greater than 0");
    }

    // === Dependency Injection ===
    let base_url = cli.base_url.as_deref().unwrap_or(&config.server.base_url);
    let transport = Arc::new(HttpEndpointTransport::new()?.with_base_url(base_url)?);
    let policy = QueryPolicy::from_timeout_seconds(cli.timeout.or(config.query.timeout_seconds));
    let use_case = AggregateQueryUseCase::new(transport).with_policy(policy);

    if cli.chat {
        ChatRepl::new(use_case, endpoints)
            .with_progress(config.repl.show_progress && !cli.quiet)
            .with_history_file(config.repl.history_file.as_ref().map(PathBuf::from))
            .run()
            .await?;
        return Ok(());
    }

    // Single prompt mode - a non-blank prompt is required
    let prompt = match cli.prompt.clone().and_then(Prompt::try_new) {
        Some(p) => p,
        None => bail!("A non-empty prompt is required. Use --chat for interactive mode."),
    };

    let format = cli.output.unwrap_or(match config.output.format {
        Some(FileOutputFormat::Json) => OutputFormat::Json,
        Some(FileOutputFormat::Panels) | None => OutputFormat::Panels,
    });

    run_once(&cli, &use_case, prompt, endpoints, format).await;
    Ok(())
}

async fn run_once(
    cli: &Cli,
    use_case: &AggregateQueryUseCase<HttpEndpointTransport>,
    prompt: Prompt,
    endpoints: EndpointSet,
    format: OutputFormat,
) {
    let input = AggregateQueryInput::new(prompt.clone(), endpoints.clone());

    let results: ResultSet = if cli.stream {
        // Panels are printed as each endpoint settles
        let print_panels = format == OutputFormat::Panels;
        let mut printed = HashSet::new();
        let results = use_case
            .stream(input)
            .collect_results_with(|event| {
                if !print_panels {
                    return;
                }
                if let Some(endpoint) = endpoints.get(event.endpoint.as_str()) {
                    print!(
                        "{}",
                        ConsoleFormatter::format_panel(endpoint, Some(&event.outcome))
                    );
                    printed.insert(event.endpoint.clone());
                }
            })
            .await;
        if print_panels {
            print!("{}", remaining_panels(&endpoints, &printed, &results));
        }
        results
    } else if cli.quiet {
        use_case.execute(input).await
    } else if std::io::stderr().is_terminal() {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await
    } else {
        use_case.execute_with_progress(input, &SimpleProgress).await
    };

    match format {
        OutputFormat::Panels if cli.stream => {}
        OutputFormat::Panels => {
            println!("{}", ConsoleFormatter::format(&prompt, &endpoints, &results));
        }
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&prompt, &results)),
    }
}

/// Panels for endpoints whose outcome was filled in after streaming ended
fn remaining_panels(
    endpoints: &EndpointSet,
    printed: &HashSet<EndpointId>,
    results: &ResultSet,
) -> String {
    endpoints
        .iter()
        .filter(|endpoint| !printed.contains(&endpoint.id))
        .map(|endpoint| ConsoleFormatter::format_panel(endpoint, results.get(endpoint.id.as_str())))
        .collect()
}

/// Initialize logging based on verbosity level
///
/// Logs go to stderr; with a log directory they are also written to a daily
/// rolling file. The returned guard must live until exit to flush the file.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "superbrain.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .init();
            None
        }
    }
}
