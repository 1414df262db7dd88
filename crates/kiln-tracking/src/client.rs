use crate::error::TrackingResult;
use crate::run::{ActiveRun, RunStatus};
use async_trait::async_trait;
use std::path::Path;

/// Client-side view of the experiment-tracking service.
///
/// The shipped implementation speaks the MLflow REST protocol
/// ([`crate::MlflowClient`]); tests substitute recording fakes. All logging
/// calls refer to an [`ActiveRun`] acquired through
/// [`TrackingClient::start_run`]; [`TrackingClient::end_run`] consumes the
/// handle and closes the run for good.
#[async_trait]
pub trait TrackingClient: Send + Sync {
    /// Open a run under `experiment`, creating the experiment if it does
    /// not exist yet.
    async fn start_run(&self, experiment: &str, run_name: &str) -> TrackingResult<ActiveRun>;

    /// Record the immutable parameter set of the run.
    async fn log_params(&self, run: &ActiveRun, params: &[(String, String)])
    -> TrackingResult<()>;

    /// Record one metric observation at `step`.
    async fn log_metric(
        &self,
        run: &ActiveRun,
        key: &str,
        value: f64,
        step: i64,
    ) -> TrackingResult<()>;

    /// Upload a local file into the run's artifact store under
    /// `artifact_dir`.
    async fn log_artifact(
        &self,
        run: &ActiveRun,
        local_path: &Path,
        artifact_dir: &str,
    ) -> TrackingResult<()>;

    /// Close the run with a terminal status.
    async fn end_run(&self, run: ActiveRun, status: RunStatus) -> TrackingResult<()>;
}
