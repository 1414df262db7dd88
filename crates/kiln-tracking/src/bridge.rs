//! Epoch metrics bridge.
//!
//! Implements the training-side [`EpochObserver`] by forwarding each numeric
//! metric of a snapshot to the tracking service, one log call per entry,
//! tagged with the epoch index as the step coordinate. Non-numeric entries
//! are skipped. Keys are normalized on the way out, so the service never
//! sees a raw backend metric name.

use crate::client::TrackingClient;
use crate::error::TrackingResult;
use crate::keys::{final_metric_key, normalize_metric_key};
use crate::run::ActiveRun;
use async_trait::async_trait;
use kiln_training::{EpochObserver, EpochSnapshot, MetricValue};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Forwards per-epoch and end-of-run metrics for one active run.
pub struct MetricsBridge<'a> {
    client: &'a dyn TrackingClient,
    run: &'a ActiveRun,
}

impl<'a> MetricsBridge<'a> {
    #[must_use]
    pub fn new(client: &'a dyn TrackingClient, run: &'a ActiveRun) -> Self {
        Self { client, run }
    }

    /// Log the end-of-run results mapping.
    ///
    /// Applies the same numeric filter and key normalization as the
    /// per-epoch path, plus the `final_` prefix. Final metrics carry no
    /// step series, so they are logged at step 0.
    pub async fn log_final(&self, results: &BTreeMap<String, MetricValue>) -> TrackingResult<()> {
        for (key, value) in results {
            if let Some(number) = value.as_f64() {
                let key = final_metric_key(key);
                self.client.log_metric(self.run, &key, number, 0).await?;
                info!(key = %key, value = %number, "Logged final metric");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EpochObserver for MetricsBridge<'_> {
    async fn on_epoch_end(&self, snapshot: &EpochSnapshot) -> anyhow::Result<()> {
        for (key, value) in snapshot.numeric_entries() {
            let key = normalize_metric_key(key);
            self.client
                .log_metric(self.run, &key, value, i64::from(snapshot.epoch))
                .await?;
            debug!(key = %key, value = %value, epoch = snapshot.epoch, "Logged metric");
        }
        Ok(())
    }
}
