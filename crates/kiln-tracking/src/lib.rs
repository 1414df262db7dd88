//! Kiln Tracking
//!
//! Client-side integration with an MLflow-compatible experiment-tracking
//! service:
//! - Run lifecycle handles (`ActiveRun`, `RunStatus`)
//! - The service trait (`TrackingClient`) and its REST implementation
//!   (`MlflowClient`)
//! - Metric forwarding from training epochs (`MetricsBridge`)
//! - Metric key normalization (`keys`)

pub mod bridge;
pub mod client;
pub mod error;
pub mod keys;
pub mod mlflow;
pub mod run;

pub use bridge::MetricsBridge;
pub use client::TrackingClient;
pub use error::{TrackingError, TrackingResult};
pub use keys::{final_metric_key, normalize_metric_key};
pub use mlflow::MlflowClient;
pub use run::{ActiveRun, ExperimentId, RunId, RunStatus};
