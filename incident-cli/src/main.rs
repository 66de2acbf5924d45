//! incident-timeline: stdio MCP server and one-shot analysis CLI for the
//! incident extraction engine.

mod commands;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Extract timelines, actions, entities and severity from incident text
#[derive(Parser, Debug)]
#[command(name = "incident-timeline", version, about, long_about = None)]
struct Cli {
    /// Workspace directory
    #[arg(short, long, default_value = ".", global = true)]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Subcommand (defaults to `serve`)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug, PartialEq)]
enum Commands {
    /// Serve MCP over stdin/stdout
    Serve,
    /// Run one extraction over a file or stdin and print the JSON result
    Analyze {
        /// Extraction to run
        #[arg(value_enum)]
        operation: commands::AnalyzeOperation,

        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,
    },
    /// Print the tool definitions
    Tools,
    /// Print the effective configuration as TOML
    Config,
}

/// Filter directive: explicit flags win, then `RUST_LOG`, then the config.
fn filter_directive(verbose: u8, quiet: bool, rust_log: Option<String>, configured: &str) -> String {
    match verbose {
        0 if quiet => "error".to_string(),
        0 => rust_log
            .filter(|directive| !directive.trim().is_empty())
            .unwrap_or_else(|| configured.to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| cli.workspace.clone());

    let config = incident_mcp::load_config(Some(&workspace), cli.config.as_deref(), None)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let filter = filter_directive(
        cli.verbose,
        cli.quiet,
        std::env::var("RUST_LOG").ok(),
        &config.logging.level,
    );

    // Stdout carries MCP traffic, so human-readable logs go to stderr.
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(&filter));

    // Optional JSON file layer; the guard flushes it on exit.
    let (json_layer, _guard) = match &config.logging.log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = tracing_appender::rolling::daily(log_dir, "incident-timeline.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    tracing::debug!(workspace = %workspace.display(), filter = %filter, "Configuration loaded");

    let command = cli.command.unwrap_or(Commands::Serve);
    commands::handle_command(command, &config).await
}
