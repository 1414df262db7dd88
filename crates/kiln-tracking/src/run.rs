use serde::{Deserialize, Serialize};

/// Identifier the tracking service assigns to an experiment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExperimentId(pub String);

impl std::fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier the tracking service assigns to a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// States of a run record, as the tracking service spells them.
///
/// The service owns the record; this crate only drives it. A run enters
/// `Running` on acquisition and leaves through exactly one terminal update.
/// `Finished` and `Failed` never transition back to `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

impl RunStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Finished => "FINISHED",
            Self::Failed => "FAILED",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to an open run on the tracking service.
///
/// Holding one means the service-side record is in the `Running` state. The
/// handle is consumed by [`crate::TrackingClient::end_run`], so a closed run
/// cannot be logged to or closed twice through the same handle.
#[derive(Debug, PartialEq, Eq)]
pub struct ActiveRun {
    pub experiment_id: ExperimentId,
    pub run_id: RunId,
}
