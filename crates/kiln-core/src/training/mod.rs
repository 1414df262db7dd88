//! Training backends and backend selection.

pub mod dry_run;

pub use dry_run::DryRunTrainer;

use crate::config::ModelSettings;
use crate::error::{LaunchError, LaunchResult};
use kiln_training::DetectorTrainer;
use std::sync::Arc;
use tracing::debug;

/// Construct the configured training backend.
pub fn resolve_trainer(model: &ModelSettings) -> LaunchResult<Arc<dyn DetectorTrainer>> {
    debug!(backend = %model.backend, checkpoint = %model.checkpoint.display(), "Resolving trainer");
    match model.backend.as_str() {
        "dry-run" => Ok(Arc::new(DryRunTrainer::new(model.checkpoint.clone()))),
        other => Err(LaunchError::UnknownBackend(other.to_string())),
    }
}
