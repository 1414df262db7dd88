//! Kiln Core
//!
//! Orchestration for one detection fine-tune run: configuration loading,
//! backend selection, and the launch pipeline that ties training to
//! experiment tracking.

pub mod config;
pub mod error;
pub mod launch;
pub mod training;

pub use config::{ConfigError, ConfigResult, LaunchConfig, ModelSettings, TrackingSettings};
pub use error::{LaunchError, LaunchResult};
pub use launch::{ArtifactRef, RunReport, launch_run};
pub use training::{DryRunTrainer, resolve_trainer};
