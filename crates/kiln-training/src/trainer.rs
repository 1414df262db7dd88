use crate::error::TrainingResult;
use crate::metrics::MetricValue;
use crate::observer::EpochObserver;
use crate::params::TrainParams;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Summary a backend returns once the training loop has finished.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainOutcome {
    pub epochs_completed: u32,
    /// End-of-run results under the backend's raw key names.
    pub results: BTreeMap<String, MetricValue>,
}

/// A detection-model training backend.
#[async_trait]
pub trait DetectorTrainer: Send + Sync {
    /// Stable backend identifier (e.g., "dry-run").
    fn id(&self) -> &'static str;

    /// Run the full training loop, notifying `observer` after every epoch.
    async fn train(
        &self,
        params: &TrainParams,
        observer: &dyn EpochObserver,
    ) -> TrainingResult<TrainOutcome>;

    /// Export the most recently trained model and return the exported file
    /// path. Only valid after a successful [`DetectorTrainer::train`] call.
    async fn export(&self) -> TrainingResult<PathBuf>;
}
