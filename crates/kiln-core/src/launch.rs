//! Run launcher.
//!
//! Drives one end-to-end fine-tune: open a tracking run, log the parameter
//! set, train with per-epoch metric forwarding, log final metrics, export
//! the model, upload it, and close the run with a terminal status.
//!
//! The tracking run is scoped: once acquired it is closed on every path,
//! `FINISHED` when the whole sequence succeeds and `FAILED` when any step
//! inside the scope errors. Errors inside the scope are not re-raised; they
//! are reported on stdout and in the returned [`RunReport`], whose status is
//! the authoritative outcome.

use crate::config::LaunchConfig;
use crate::error::LaunchResult;
use kiln_tracking::{ActiveRun, MetricsBridge, RunStatus, TrackingClient};
use kiln_training::DetectorTrainer;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Exported model artifact recorded for a run.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactRef {
    pub path: PathBuf,
    pub sha256: String,
}

/// Outcome of one launch, mirroring what the tracking service recorded.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub run_name: String,
    pub experiment: String,
    pub status: RunStatus,
    pub epochs_completed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunReport {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status == RunStatus::Finished
    }
}

struct ScopeOutcome {
    epochs_completed: u32,
    artifact: ArtifactRef,
}

/// Launch one training run.
///
/// Fails fast (no tracking run is opened) when the parameter set is
/// invalid. After the run is acquired, every error lands in the report
/// instead of the `Err` channel; `Err` past that point means the tracking
/// service itself could not be driven (run acquisition or closure failed).
pub async fn launch_run(
    config: &LaunchConfig,
    trainer: &dyn DetectorTrainer,
    client: &dyn TrackingClient,
) -> LaunchResult<RunReport> {
    let params = &config.params;
    params.validate()?;

    info!(
        experiment = %config.tracking.experiment,
        run_name = %params.name,
        backend = trainer.id(),
        "Launching training run"
    );

    let run = client.start_run(&config.tracking.experiment, &params.name).await?;
    let run_id = run.run_id.to_string();

    let outcome = run_scope(&run, config, trainer, client).await;

    let (status, epochs_completed, artifact, error_message) = match outcome {
        Ok(scope) => (RunStatus::Finished, scope.epochs_completed, Some(scope.artifact), None),
        Err(e) => {
            let message = e.to_string();
            println!("Error: {message}");
            error!(error = %message, "Training run failed");
            (RunStatus::Failed, 0, None, Some(message))
        }
    };

    client.end_run(run, status).await?;
    info!(run_id = %run_id, status = %status, "Run closed");

    Ok(RunReport {
        run_id,
        run_name: params.name.clone(),
        experiment: config.tracking.experiment.clone(),
        status,
        epochs_completed,
        artifact,
        error: error_message,
    })
}

/// Everything that happens while the tracking run is open.
async fn run_scope(
    run: &ActiveRun,
    config: &LaunchConfig,
    trainer: &dyn DetectorTrainer,
    client: &dyn TrackingClient,
) -> LaunchResult<ScopeOutcome> {
    let params = &config.params;
    client.log_params(run, &params.to_pairs()).await?;

    let bridge = MetricsBridge::new(client, run);
    let outcome = trainer.train(params, &bridge).await?;
    info!(epochs = outcome.epochs_completed, "Training loop finished");

    bridge.log_final(&outcome.results).await?;

    let exported = trainer.export().await?;
    client.log_artifact(run, &exported, &config.tracking.artifact_dir).await?;
    info!(path = %exported.display(), "Final model uploaded");

    let artifact = ArtifactRef { sha256: sha256_file(&exported)?, path: exported };
    Ok(ScopeOutcome { epochs_completed: outcome.epochs_completed, artifact })
}

fn sha256_file(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
