//! Launch configuration file support.
//!
//! Run settings load from a TOML file. Every field carries a compiled-in
//! default matching the baseline deployment, so a missing file or a partial
//! file is fine.

use kiln_training::TrainParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level launch configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Tracking service settings.
    pub tracking: TrackingSettings,

    /// Model selection settings.
    pub model: ModelSettings,

    /// The parameter set handed to the training backend.
    pub params: TrainParams,
}

/// Tracking service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingSettings {
    /// Base URI of the tracking server.
    pub uri: String,

    /// Experiment the run is filed under.
    pub experiment: String,

    /// Artifact directory name for the exported model.
    pub artifact_dir: String,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            uri: "http://10.10.40.132:8080".to_string(),
            experiment: "Yolov10".to_string(),
            artifact_dir: "final_model".to_string(),
        }
    }
}

/// Model selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Pretrained checkpoint to fine-tune.
    pub checkpoint: PathBuf,

    /// Training backend identifier (see `training::resolve_trainer`).
    pub backend: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            checkpoint: PathBuf::from("/mnt/Disk1/source/yolov10/weights/yolov10l.pt"),
            backend: "dry-run".to_string(),
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    Read(String),

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    Parse(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl LaunchConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))
    }

    /// Load `path` when given, the local `kiln.toml` when one exists, or
    /// fall back to compiled-in defaults.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let local = Self::default_local_path();
                if local.exists() {
                    Self::load_from_file(&local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Default local configuration file path.
    #[must_use]
    pub fn default_local_path() -> PathBuf {
        PathBuf::from("kiln.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_training::Optimizer;
    use std::io::Write;

    #[test]
    fn test_defaults_match_baseline_deployment() {
        let config = LaunchConfig::default();
        assert_eq!(config.tracking.uri, "http://10.10.40.132:8080");
        assert_eq!(config.tracking.experiment, "Yolov10");
        assert_eq!(config.tracking.artifact_dir, "final_model");
        assert_eq!(config.model.backend, "dry-run");
        assert_eq!(config.params.name, "Ex1-R1-BaseLine");
        assert_eq!(config.params.epochs, 150);
        assert_eq!(config.params.optimizer, Optimizer::AdamW);
    }

    #[test]
    fn test_partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiln.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[tracking]
uri = "http://localhost:5000"

[params]
epochs = 3
name = "smoke"
"#
        )
        .unwrap();

        let config = LaunchConfig::load_from_file(&path).unwrap();
        assert_eq!(config.tracking.uri, "http://localhost:5000");
        assert_eq!(config.tracking.experiment, "Yolov10");
        assert_eq!(config.params.epochs, 3);
        assert_eq!(config.params.name, "smoke");
        assert!(config.params.cos_lr);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = LaunchConfig::load_from_file(Path::new("/nonexistent/kiln.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiln.toml");
        std::fs::write(&path, "tracking = 12").unwrap();

        let result = LaunchConfig::load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_without_path_falls_back_to_defaults() {
        // No kiln.toml in the test working directory.
        let config = LaunchConfig::load(None).unwrap();
        assert_eq!(config.params.epochs, 150);
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = LaunchConfig::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: LaunchConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.params, config.params);
        assert_eq!(parsed.tracking.uri, config.tracking.uri);
    }
}
