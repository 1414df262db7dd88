use crate::error::{TrainingError, TrainingResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Optimizer choice handed through to the training backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Optimizer {
    #[serde(rename = "SGD")]
    Sgd,
    #[serde(rename = "Adam")]
    Adam,
    #[serde(rename = "AdamW")]
    AdamW,
}

impl Optimizer {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sgd => "SGD",
            Self::Adam => "Adam",
            Self::AdamW => "AdamW",
        }
    }
}

impl std::fmt::Display for Optimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full parameter set for one fine-tune run.
///
/// Constructed once per run and passed by value into the backend; nothing
/// mutates it afterwards. Defaults match the single-class baseline
/// configuration this project ships with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainParams {
    /// Dataset descriptor file consumed by the backend.
    pub data: PathBuf,
    /// Run name; also names the tracking run.
    pub name: String,
    /// Collapse all annotation classes into a single class.
    pub single_cls: bool,
    pub epochs: u32,
    pub optimizer: Optimizer,
    /// Initial learning rate.
    pub lr0: f64,
    /// Final learning rate, as a fraction of `lr0`.
    pub lrf: f64,
    /// Cosine learning-rate schedule instead of linear decay.
    pub cos_lr: bool,
    /// Save predicted labels as text files.
    pub save_txt: bool,
    /// Include confidence values in saved labels.
    pub save_conf: bool,
    /// Fraction of the training dataset to use, in (0, 1].
    pub fraction: f64,
    /// Let the backend drive its own tracking integration. Off by default:
    /// metric forwarding belongs to the run launcher, and a backend writing
    /// to the tracking service on its own would double-log every run.
    pub builtin_tracking: bool,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            data: PathBuf::from("/mnt/Disk1/source/yolov10/data/data.yaml"),
            name: "Ex1-R1-BaseLine".to_string(),
            single_cls: true,
            epochs: 150,
            optimizer: Optimizer::AdamW,
            lr0: 0.0002,
            lrf: 0.000_000_2,
            cos_lr: true,
            save_txt: true,
            save_conf: true,
            fraction: 1.0,
            builtin_tracking: false,
        }
    }
}

impl TrainParams {
    pub fn validate(&self) -> TrainingResult<()> {
        if self.data.as_os_str().is_empty() {
            return Err(TrainingError::InvalidParams("data is required".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(TrainingError::InvalidParams("name is required".to_string()));
        }
        if self.epochs == 0 {
            return Err(TrainingError::InvalidParams("epochs must be >= 1".to_string()));
        }
        if !self.lr0.is_finite() || self.lr0 <= 0.0 {
            return Err(TrainingError::InvalidParams("lr0 must be > 0".to_string()));
        }
        if !self.lrf.is_finite() || self.lrf <= 0.0 {
            return Err(TrainingError::InvalidParams("lrf must be > 0".to_string()));
        }
        if !self.fraction.is_finite() || self.fraction <= 0.0 || self.fraction > 1.0 {
            return Err(TrainingError::InvalidParams("fraction must be in (0, 1]".to_string()));
        }
        Ok(())
    }

    /// Key/value view of the parameter set, in declaration order, for the
    /// tracking service's parameter log.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("data".to_string(), self.data.display().to_string()),
            ("name".to_string(), self.name.clone()),
            ("single_cls".to_string(), self.single_cls.to_string()),
            ("epochs".to_string(), self.epochs.to_string()),
            ("optimizer".to_string(), self.optimizer.to_string()),
            ("lr0".to_string(), self.lr0.to_string()),
            ("lrf".to_string(), self.lrf.to_string()),
            ("cos_lr".to_string(), self.cos_lr.to_string()),
            ("save_txt".to_string(), self.save_txt.to_string()),
            ("save_conf".to_string(), self.save_conf.to_string()),
            ("fraction".to_string(), self.fraction.to_string()),
            ("builtin_tracking".to_string(), self.builtin_tracking.to_string()),
        ]
    }
}
