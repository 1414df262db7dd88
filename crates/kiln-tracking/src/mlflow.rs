//! MLflow tracking client.
//!
//! This module implements the `TrackingClient` trait against the MLflow
//! REST API (2.0): experiment lookup/creation, run lifecycle, parameter and
//! metric logging, and artifact upload through the mlflow-artifacts proxy.

use crate::client::TrackingClient;
use crate::error::{TrackingError, TrackingResult};
use crate::run::{ActiveRun, ExperimentId, RunId, RunStatus};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error};

/// Client for an MLflow-compatible tracking server.
#[derive(Debug, Clone)]
pub struct MlflowClient {
    /// Base URL of the tracking server (e.g., "http://10.10.40.132:8080").
    base_url: String,
    /// HTTP client for making requests.
    client: Client,
}

impl MlflowClient {
    /// Creates a new `MlflowClient` for the given tracking server.
    ///
    /// A trailing slash on `base_url` is tolerated and removed.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client: Client::new() }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/2.0/mlflow/{}", self.base_url, path)
    }

    fn transport_error(&self, e: &reqwest::Error) -> TrackingError {
        error!(error = %e, base_url = %self.base_url, "Failed to reach tracking server");
        if e.is_connect() {
            TrackingError::Request(format!(
                "tracking server not reachable at {}",
                self.base_url
            ))
        } else {
            TrackingError::Request(format!("network error: {}", e))
        }
    }

    fn service_error(status: u16, body: &str) -> TrackingError {
        // MLflow error bodies carry {"error_code": ..., "message": ...}
        if let Ok(api) = serde_json::from_str::<ApiError>(body) {
            TrackingError::Service {
                status,
                message: format!("{}: {}", api.error_code, api.message),
            }
        } else {
            TrackingError::Service { status, message: body.to_string() }
        }
    }

    async fn check_status(response: reqwest::Response) -> TrackingResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        error!(status = %status, error = %body, "Tracking API returned error status");
        Err(Self::service_error(status.as_u16(), &body))
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> TrackingResult<T> {
        response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse tracking API response");
            TrackingError::Serialization(format!("failed to parse response: {}", e))
        })
    }

    async fn post_api<Req: Serialize>(
        &self,
        path: &str,
        body: &Req,
    ) -> TrackingResult<reqwest::Response> {
        let url = self.api_url(path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;
        Self::check_status(response).await
    }

    /// Resolve the experiment id for `name`, creating the experiment when
    /// the server does not know it yet.
    async fn ensure_experiment(&self, name: &str) -> TrackingResult<ExperimentId> {
        debug!(experiment = %name, "Resolving experiment");
        let url = self.api_url("experiments/create");
        let response = self
            .client
            .post(&url)
            .json(&CreateExperimentRequest { name })
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if status.is_success() {
            let created: CreateExperimentResponse = Self::parse_json(response).await?;
            return Ok(ExperimentId(created.experiment_id));
        }

        let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        if let Ok(api) = serde_json::from_str::<ApiError>(&body) {
            if api.error_code == "RESOURCE_ALREADY_EXISTS" {
                return self.get_experiment_by_name(name).await;
            }
        }
        error!(status = %status, error = %body, "Failed to create experiment");
        Err(Self::service_error(status.as_u16(), &body))
    }

    async fn get_experiment_by_name(&self, name: &str) -> TrackingResult<ExperimentId> {
        let url = self.api_url("experiments/get-by-name");
        let response = self
            .client
            .get(&url)
            .query(&[("experiment_name", name)])
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;
        let response = Self::check_status(response).await?;
        let found: GetExperimentResponse = Self::parse_json(response).await?;
        Ok(ExperimentId(found.experiment.experiment_id))
    }
}

// MLflow REST API request/response structures
#[derive(Serialize)]
struct CreateExperimentRequest<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct CreateExperimentResponse {
    experiment_id: String,
}

#[derive(Deserialize)]
struct GetExperimentResponse {
    experiment: ExperimentInfo,
}

#[derive(Deserialize)]
struct ExperimentInfo {
    experiment_id: String,
}

#[derive(Serialize)]
struct CreateRunRequest {
    experiment_id: String,
    run_name: String,
    start_time: i64,
}

#[derive(Deserialize)]
struct CreateRunResponse {
    run: RunBody,
}

#[derive(Deserialize)]
struct RunBody {
    info: RunInfo,
}

#[derive(Deserialize)]
struct RunInfo {
    run_id: String,
}

#[derive(Serialize)]
struct ParamEntry {
    key: String,
    value: String,
}

#[derive(Serialize)]
struct LogBatchRequest {
    run_id: String,
    params: Vec<ParamEntry>,
}

#[derive(Serialize)]
struct LogMetricRequest {
    run_id: String,
    key: String,
    value: f64,
    timestamp: i64,
    step: i64,
}

#[derive(Serialize)]
struct UpdateRunRequest {
    run_id: String,
    status: &'static str,
    end_time: i64,
}

#[derive(Deserialize)]
struct ApiError {
    error_code: String,
    #[serde(default)]
    message: String,
}

#[async_trait]
impl TrackingClient for MlflowClient {
    async fn start_run(&self, experiment: &str, run_name: &str) -> TrackingResult<ActiveRun> {
        let experiment_id = self.ensure_experiment(experiment).await?;
        debug!(experiment_id = %experiment_id, run_name = %run_name, "Starting run");

        let request = CreateRunRequest {
            experiment_id: experiment_id.0.clone(),
            run_name: run_name.to_string(),
            start_time: Utc::now().timestamp_millis(),
        };
        let response = self.post_api("runs/create", &request).await?;
        let created: CreateRunResponse = Self::parse_json(response).await?;
        let run_id = RunId(created.run.info.run_id);
        debug!(run_id = %run_id, "Run started");

        Ok(ActiveRun { experiment_id, run_id })
    }

    async fn log_params(
        &self,
        run: &ActiveRun,
        params: &[(String, String)],
    ) -> TrackingResult<()> {
        debug!(run_id = %run.run_id, count = params.len(), "Logging run parameters");
        let request = LogBatchRequest {
            run_id: run.run_id.0.clone(),
            params: params
                .iter()
                .map(|(key, value)| ParamEntry { key: key.clone(), value: value.clone() })
                .collect(),
        };
        self.post_api("runs/log-batch", &request).await?;
        Ok(())
    }

    async fn log_metric(
        &self,
        run: &ActiveRun,
        key: &str,
        value: f64,
        step: i64,
    ) -> TrackingResult<()> {
        let request = LogMetricRequest {
            run_id: run.run_id.0.clone(),
            key: key.to_string(),
            value,
            timestamp: Utc::now().timestamp_millis(),
            step,
        };
        self.post_api("runs/log-metric", &request).await?;
        Ok(())
    }

    async fn log_artifact(
        &self,
        run: &ActiveRun,
        local_path: &Path,
        artifact_dir: &str,
    ) -> TrackingResult<()> {
        let file_name = local_path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
            TrackingError::Artifact(format!(
                "artifact path has no file name: {}",
                local_path.display()
            ))
        })?;
        let bytes = tokio::fs::read(local_path).await?;

        let url = format!(
            "{}/api/2.0/mlflow-artifacts/artifacts/{}/{}/artifacts/{}/{}",
            self.base_url, run.experiment_id, run.run_id, artifact_dir, file_name
        );
        debug!(url = %url, size = bytes.len(), "Uploading artifact");
        let response = self
            .client
            .put(&url)
            .body(bytes)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn end_run(&self, run: ActiveRun, status: RunStatus) -> TrackingResult<()> {
        debug!(run_id = %run.run_id, status = %status, "Closing run");
        let request = UpdateRunRequest {
            run_id: run.run_id.0.clone(),
            status: status.as_str(),
            end_time: Utc::now().timestamp_millis(),
        };
        self.post_api("runs/update", &request).await?;
        Ok(())
    }
}
