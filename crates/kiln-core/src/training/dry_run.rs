//! Dry-run training backend.
//!
//! Walks the full launch pipeline without touching a GPU: it checks that
//! the dataset descriptor and checkpoint exist, replays a deterministic
//! metric schedule through the epoch observer, and "exports" by copying the
//! checkpoint bytes. Useful for exercising the tracking integration and for
//! rehearsing a configuration before committing cluster time.

use async_trait::async_trait;
use kiln_training::{
    DetectorTrainer, EpochObserver, EpochSnapshot, MetricValue, TrainOutcome, TrainParams,
    TrainingError, TrainingResult,
};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

/// Trainer that simulates a fine-tune run on the local filesystem.
pub struct DryRunTrainer {
    checkpoint: PathBuf,
    exported: Mutex<Option<PathBuf>>,
}

impl DryRunTrainer {
    #[must_use]
    pub fn new(checkpoint: PathBuf) -> Self {
        Self { checkpoint, exported: Mutex::new(None) }
    }

    /// Learning rate at `epoch`, decaying from `lr0` towards `lr0 * lrf`
    /// with the configured schedule shape.
    fn learning_rate(params: &TrainParams, epoch: u32) -> f64 {
        let total = f64::from(params.epochs.max(1));
        let progress = f64::from(epoch) / total;
        let floor = params.lr0 * params.lrf;
        if params.cos_lr {
            floor + (params.lr0 - floor) * ((1.0 + (PI * progress).cos()) / 2.0)
        } else {
            params.lr0 + (floor - params.lr0) * progress
        }
    }

    /// Metric schedule for one epoch, under the raw key names a detection
    /// backend reports. Losses shrink and scores grow monotonically; a
    /// smaller dataset fraction converges more slowly.
    fn snapshot(params: &TrainParams, epoch: u32) -> EpochSnapshot {
        let progress = f64::from(epoch + 1) / f64::from(params.epochs);
        let gain = params.fraction * progress;

        let mut snapshot = EpochSnapshot::new(epoch);
        snapshot.insert("train/box_loss", 1.8 * (1.0 - 0.6 * gain));
        snapshot.insert("train/cls_loss", 1.2 * (1.0 - 0.7 * gain));
        snapshot.insert("train/dfl_loss", 1.0 - 0.5 * gain);
        snapshot.insert("metrics/precision(B)", 0.35 + 0.6 * gain);
        snapshot.insert("metrics/recall(B)", 0.30 + 0.55 * gain);
        snapshot.insert("metrics/mAP50(B)", 0.25 + 0.6 * gain);
        snapshot.insert("metrics/mAP50-95(B)", 0.15 + 0.5 * gain);
        snapshot.insert("lr/pg0", Self::learning_rate(params, epoch));
        snapshot
    }

    fn final_results(params: &TrainParams) -> BTreeMap<String, MetricValue> {
        let last = Self::snapshot(params, params.epochs - 1);
        let metric = |key: &str| last.values.get(key).and_then(MetricValue::as_f64).unwrap_or_default();

        let mut results = BTreeMap::new();
        for key in [
            "metrics/precision(B)",
            "metrics/recall(B)",
            "metrics/mAP50(B)",
            "metrics/mAP50-95(B)",
        ] {
            results.insert(key.to_string(), MetricValue::Float(metric(key)));
        }
        // The usual detector weighting: fitness leans on mAP50-95.
        let fitness = 0.1 * metric("metrics/mAP50(B)") + 0.9 * metric("metrics/mAP50-95(B)");
        results.insert("fitness".to_string(), MetricValue::Float(fitness));
        results
    }

    fn export_path(&self) -> PathBuf {
        let stem = self.checkpoint.file_stem().and_then(|s| s.to_str()).unwrap_or("model");
        self.checkpoint.with_file_name(format!("{stem}.onnx"))
    }
}

#[async_trait]
impl DetectorTrainer for DryRunTrainer {
    fn id(&self) -> &'static str {
        "dry-run"
    }

    async fn train(
        &self,
        params: &TrainParams,
        observer: &dyn EpochObserver,
    ) -> TrainingResult<TrainOutcome> {
        params.validate()?;
        if params.builtin_tracking {
            return Err(TrainingError::InvalidParams(
                "builtin_tracking is not available in the dry-run backend".to_string(),
            ));
        }
        if !self.checkpoint.exists() {
            return Err(TrainingError::Trainer(format!(
                "checkpoint does not exist: {}",
                self.checkpoint.display()
            )));
        }
        if !params.data.exists() {
            return Err(TrainingError::Trainer(format!(
                "dataset descriptor does not exist: {}",
                params.data.display()
            )));
        }

        debug!(epochs = params.epochs, data = %params.data.display(), "Dry run starting");
        for epoch in 0..params.epochs {
            let snapshot = Self::snapshot(params, epoch);
            observer.on_epoch_end(&snapshot).await?;
        }

        if let Ok(mut exported) = self.exported.lock() {
            *exported = Some(self.export_path());
        }

        Ok(TrainOutcome { epochs_completed: params.epochs, results: Self::final_results(params) })
    }

    async fn export(&self) -> TrainingResult<PathBuf> {
        let target = self
            .exported
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().cloned())
            .ok_or_else(|| TrainingError::Export("no trained model to export".to_string()))?;
        std::fs::copy(&self.checkpoint, &target)?;
        debug!(path = %target.display(), "Dry run export written");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_training::NullObserver;
    use std::sync::Mutex as StdMutex;
    use tempfile::TempDir;

    struct CollectingObserver {
        snapshots: StdMutex<Vec<EpochSnapshot>>,
    }

    #[async_trait]
    impl EpochObserver for CollectingObserver {
        async fn on_epoch_end(&self, snapshot: &EpochSnapshot) -> anyhow::Result<()> {
            self.snapshots.lock().unwrap().push(snapshot.clone());
            Ok(())
        }
    }

    struct FailingObserver;

    #[async_trait]
    impl EpochObserver for FailingObserver {
        async fn on_epoch_end(&self, _snapshot: &EpochSnapshot) -> anyhow::Result<()> {
            anyhow::bail!("sink rejected the snapshot")
        }
    }

    fn workspace(epochs: u32) -> (TempDir, DryRunTrainer, TrainParams) {
        let dir = TempDir::new().unwrap();
        let checkpoint = dir.path().join("yolov10l.pt");
        let data = dir.path().join("data.yaml");
        std::fs::write(&checkpoint, b"pretrained-weights").unwrap();
        std::fs::write(&data, b"names: [person]").unwrap();

        let params = TrainParams { data, epochs, ..TrainParams::default() };
        let trainer = DryRunTrainer::new(checkpoint);
        (dir, trainer, params)
    }

    #[tokio::test]
    async fn test_one_snapshot_per_epoch_with_raw_keys() {
        let (_dir, trainer, params) = workspace(3);
        let observer = CollectingObserver { snapshots: StdMutex::new(Vec::new()) };

        let outcome = trainer.train(&params, &observer).await.unwrap();
        assert_eq!(outcome.epochs_completed, 3);

        let snapshots = observer.snapshots.lock().unwrap();
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0].epoch, 0);
        assert_eq!(snapshots[2].epoch, 2);
        // Raw backend names, normalization is not this layer's job.
        assert!(snapshots[0].values.contains_key("metrics/precision(B)"));
        assert!(snapshots[0].values.contains_key("train/box_loss"));
    }

    #[tokio::test]
    async fn test_scores_grow_and_losses_shrink() {
        let (_dir, trainer, params) = workspace(5);
        let observer = CollectingObserver { snapshots: StdMutex::new(Vec::new()) };

        trainer.train(&params, &observer).await.unwrap();

        let snapshots = observer.snapshots.lock().unwrap();
        let value = |i: usize, key: &str| snapshots[i].values[key].as_f64().unwrap();
        assert!(value(4, "metrics/mAP50(B)") > value(0, "metrics/mAP50(B)"));
        assert!(value(4, "train/box_loss") < value(0, "train/box_loss"));
        assert!(value(4, "lr/pg0") < value(0, "lr/pg0"));
    }

    #[tokio::test]
    async fn test_final_results_are_numeric_summaries() {
        let (_dir, trainer, params) = workspace(2);
        let outcome = trainer.train(&params, &NullObserver).await.unwrap();

        assert!(outcome.results.contains_key("fitness"));
        assert!(outcome.results.contains_key("metrics/mAP50-95(B)"));
        assert!(outcome.results.values().all(MetricValue::is_numeric));
    }

    #[tokio::test]
    async fn test_missing_checkpoint_fails_training() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data.yaml");
        std::fs::write(&data, b"names: [person]").unwrap();

        let trainer = DryRunTrainer::new(dir.path().join("missing.pt"));
        let params = TrainParams { data, epochs: 1, ..TrainParams::default() };

        let err = trainer.train(&params, &NullObserver).await.unwrap_err();
        assert!(err.to_string().contains("checkpoint does not exist"));
    }

    #[tokio::test]
    async fn test_missing_dataset_descriptor_fails_training() {
        let dir = TempDir::new().unwrap();
        let checkpoint = dir.path().join("yolov10l.pt");
        std::fs::write(&checkpoint, b"pretrained-weights").unwrap();

        let trainer = DryRunTrainer::new(checkpoint);
        let params = TrainParams {
            data: dir.path().join("missing.yaml"),
            epochs: 1,
            ..TrainParams::default()
        };

        let err = trainer.train(&params, &NullObserver).await.unwrap_err();
        assert!(err.to_string().contains("dataset descriptor does not exist"));
    }

    #[tokio::test]
    async fn test_builtin_tracking_is_rejected() {
        let (_dir, trainer, params) = workspace(1);
        let params = TrainParams { builtin_tracking: true, ..params };

        let err = trainer.train(&params, &NullObserver).await.unwrap_err();
        assert!(err.to_string().contains("builtin_tracking"));
    }

    #[tokio::test]
    async fn test_export_requires_a_trained_model() {
        let (_dir, trainer, _params) = workspace(1);
        let err = trainer.export().await.unwrap_err();
        assert!(err.to_string().contains("no trained model"));
    }

    #[tokio::test]
    async fn test_export_copies_checkpoint_bytes() {
        let (dir, trainer, params) = workspace(1);
        trainer.train(&params, &NullObserver).await.unwrap();

        let exported = trainer.export().await.unwrap();
        assert_eq!(exported, dir.path().join("yolov10l.onnx"));
        assert_eq!(std::fs::read(&exported).unwrap(), b"pretrained-weights");
    }

    #[tokio::test]
    async fn test_observer_failure_aborts_training() {
        let (_dir, trainer, params) = workspace(2);
        let err = trainer.train(&params, &FailingObserver).await.unwrap_err();
        assert!(err.to_string().contains("sink rejected the snapshot"));
    }
}
