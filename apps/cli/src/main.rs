//! Kiln CLI - launch a detection fine-tune run with experiment tracking.
//!
//! Provides the `kiln` command: `kiln run` drives one training run end to
//! end against the configured backend and tracking server; `kiln config`
//! prints the effective configuration.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Kiln - single-run training launcher with experiment tracking
#[derive(Parser, Debug)]
#[command(
    name = "kiln",
    version,
    about = "Kiln - launch a detection fine-tune and track it",
    long_about = "Kiln launches one object-detection fine-tune run, forwards per-epoch\nmetrics to an MLflow-compatible tracking server, and records the exported\nmodel artifact."
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Configuration file (defaults to ./kiln.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Launch one training run
    ///
    /// Opens a tracking run, logs the parameter set, trains with per-epoch
    /// metric forwarding, uploads the exported model, and closes the run
    /// with FINISHED or FAILED. Exits nonzero when the run failed.
    Run {
        /// Output the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber =
        FmtSubscriber::builder().with_max_level(level).without_time().with_target(false).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Some(Command::Run { json }) => commands::run::execute(args.config.as_deref(), json).await,
        Some(Command::Config) => commands::config::execute(args.config.as_deref()),
        None => {
            use clap::CommandFactory;
            Args::command().print_help()?;
            Ok(())
        }
    }
}
