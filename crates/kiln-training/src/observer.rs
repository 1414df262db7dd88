use crate::metrics::EpochSnapshot;
use async_trait::async_trait;

/// Observer notified by a backend at each epoch boundary.
///
/// The backend owns the snapshot and drops it after the call; observers that
/// need the data beyond the notification must copy it out. An error return
/// aborts the run.
#[async_trait]
pub trait EpochObserver: Send + Sync {
    async fn on_epoch_end(&self, snapshot: &EpochSnapshot) -> anyhow::Result<()>;
}

/// Observer that discards every notification.
#[derive(Debug, Default)]
pub struct NullObserver;

#[async_trait]
impl EpochObserver for NullObserver {
    async fn on_epoch_end(&self, _snapshot: &EpochSnapshot) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_observer_accepts_snapshots() {
        let observer = NullObserver;
        let snapshot = EpochSnapshot::new(0);
        assert!(observer.on_epoch_end(&snapshot).await.is_ok());
    }
}
