//! Windmill job client
//!
//! Submits a named flow with a JSON argument payload, then polls the
//! completed-job endpoint until the result is available or the configured
//! timeout elapses. Every invocation is a fresh submit-and-poll cycle; there
//! is no result caching and no cancellation beyond the timeout.

use reqwest::{header, Client as HttpClient, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::WindmillConfig;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid authentication token")]
    InvalidToken,
}

/// Terminal state of one flow invocation
///
/// Failures and timeouts are values, not errors; callers format them as text.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Completed {
        job_id: String,
        result: Value,
        logs: Value,
    },
    Failed {
        error: String,
    },
    TimedOut,
}

impl JobOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Completed { .. })
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    uuid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletedJob {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    logs: Value,
}

/// Client for the Windmill jobs API
#[derive(Clone)]
pub struct WindmillClient {
    http_client: HttpClient,
    config: WindmillConfig,
}

impl WindmillClient {
    /// Create a new client. The bearer token, when set, is attached to every
    /// request.
    pub fn new(config: WindmillConfig) -> Result<Self, ClientError> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = &config.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClientError::InvalidToken)?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let http_client = HttpClient::builder()
            .user_agent("opsflow/0.1")
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Submit a flow and wait for its result.
    pub async fn run_flow(&self, flow_path: &str, args: &Value) -> JobOutcome {
        let url = format!(
            "{}/api/w/{}/jobs/run/{}",
            self.config.base_url, self.config.workspace, flow_path
        );

        info!("Submitting flow {flow_path}");

        let response = match self.http_client.post(&url).json(args).send().await {
            Ok(response) => response,
            Err(e) => {
                return JobOutcome::Failed {
                    error: format!("Request failed: {e}"),
                }
            }
        };

        if !response.status().is_success() {
            return JobOutcome::Failed {
                error: format!("Flow submission failed with status {}", response.status()),
            };
        }

        let submit: SubmitResponse = match response.json().await {
            Ok(submit) => submit,
            Err(e) => {
                return JobOutcome::Failed {
                    error: format!("Invalid submission response: {e}"),
                }
            }
        };

        let Some(job_id) = submit.uuid else {
            return JobOutcome::Failed {
                error: "No job ID returned".to_string(),
            };
        };

        debug!("Flow {flow_path} submitted as job {job_id}");
        self.wait_for_completion(&job_id).await
    }

    /// Poll the completed-job endpoint until the result shows up.
    ///
    /// A 404 means the job is still running; any other non-success status
    /// terminates polling immediately.
    async fn wait_for_completion(&self, job_id: &str) -> JobOutcome {
        let url = format!(
            "{}/api/w/{}/jobs_u/completed/{}",
            self.config.base_url, self.config.workspace, job_id
        );

        let deadline = Instant::now() + self.config.timeout;

        loop {
            let response = match self.http_client.get(&url).send().await {
                Ok(response) => response,
                Err(e) => {
                    return JobOutcome::Failed {
                        error: format!("Error checking job status: {e}"),
                    }
                }
            };

            match response.status() {
                StatusCode::OK => {
                    let job: CompletedJob = match response.json().await {
                        Ok(job) => job,
                        Err(e) => {
                            return JobOutcome::Failed {
                                error: format!("Invalid job result payload: {e}"),
                            }
                        }
                    };
                    return JobOutcome::Completed {
                        job_id: job_id.to_string(),
                        result: job.result,
                        logs: job.logs,
                    };
                }
                StatusCode::NOT_FOUND => {
                    // Job still running
                    if Instant::now() + self.config.poll_interval > deadline {
                        warn!("Job {job_id} did not complete within the timeout");
                        return JobOutcome::TimedOut;
                    }
                    debug!("Job {job_id} not complete yet, polling again");
                    sleep(self.config.poll_interval).await;
                }
                status => {
                    return JobOutcome::Failed {
                        error: format!("Job failed with status {status}"),
                    };
                }
            }
        }
    }
}
