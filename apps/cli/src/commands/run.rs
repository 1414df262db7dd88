//! Run command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use kiln_core::{LaunchConfig, RunReport, launch_run, resolve_trainer};
use kiln_tracking::{MlflowClient, RunStatus};
use std::path::Path;

pub async fn execute(config_path: Option<&Path>, json_output: bool) -> Result<()> {
    let config = LaunchConfig::load(config_path).context("Failed to load configuration")?;
    let trainer =
        resolve_trainer(&config.model).context("Failed to resolve training backend")?;
    let client = MlflowClient::new(config.tracking.uri.clone());

    let report = launch_run(&config, trainer.as_ref(), &client)
        .await
        .context("Failed to drive the tracking run")?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.succeeded() {
        Ok(())
    } else {
        anyhow::bail!("training run ended with status FAILED")
    }
}

fn print_report(report: &RunReport) {
    println!();
    if report.succeeded() {
        println!("{}", "Training run finished".bold().green());
    } else {
        println!("{}", "Training run failed".bold().red());
    }
    println!("  Experiment: {}", report.experiment.cyan());
    println!("  Run: {} ({})", report.run_name.cyan(), report.run_id.dimmed());
    println!("  Status: {}", status_label(report.status));
    println!("  Epochs: {}", report.epochs_completed);
    if let Some(artifact) = &report.artifact {
        println!("  Final model saved at: {}", artifact.path.display());
        println!("  SHA-256: {}", artifact.sha256.dimmed());
    }
    if let Some(error) = &report.error {
        println!("  Error: {}", error.red());
    }
    println!();
    println!("Training completed. Check MLflow for results.");
}

fn status_label(status: RunStatus) -> colored::ColoredString {
    match status {
        RunStatus::Running => "RUNNING".yellow(),
        RunStatus::Finished => "FINISHED".green(),
        RunStatus::Failed => "FAILED".red(),
    }
}
