//! Kiln Training
//!
//! Backend-agnostic primitives for a single detection fine-tune run:
//! - Declaring the run's parameter set (`TrainParams`)
//! - Reporting per-epoch metrics (`EpochSnapshot`, `EpochObserver`)
//! - Implementing training backends (`DetectorTrainer`)

pub mod error;
pub mod metrics;
pub mod observer;
pub mod params;
pub mod trainer;

pub use error::{TrainingError, TrainingResult};
pub use metrics::{EpochSnapshot, MetricValue};
pub use observer::{EpochObserver, NullObserver};
pub use params::{Optimizer, TrainParams};
pub use trainer::{DetectorTrainer, TrainOutcome};
