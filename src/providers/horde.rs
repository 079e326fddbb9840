//! Distributed inference network adapter.
//!
//! The distributed family is submit-then-poll: a job is created with the
//! flattened prompt, sampling parameters, a curated list of acceptable
//! models, and a mature-content flag, then its status is polled on a fixed
//! interval up to a bounded number of attempts. No partial or streaming
//! results exist; a job ends by completing, faulting, or running out the
//! poll ceiling.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::map_send_error;
use super::traits::CompletionBackend;
use crate::prompt;
use crate::telemetry;
use crate::types::GenerationRequest;
use crate::{BragiError, Result};

/// Default base URL for the distributed network.
pub const DEFAULT_BASE_URL: &str = "https://aihorde.net/api";

/// Anonymous-access credential accepted by the network.
const ANONYMOUS_API_KEY: &str = "0000000000";

/// Models acceptable for character dialogue, in preference order.
const ACCEPTED_MODELS: &[&str] = &[
    "Gryphe/MythoMax-L2-13b",
    "PygmalionAI/mythalion-13b",
    "KoboldAI/LLaMA2-13B-Tiefighter",
];

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);
const POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_POLL_ATTEMPTS: u32 = 150;

/// Client for the distributed inference network.
#[derive(Clone)]
pub struct HordeClient {
    http: Client,
    base_url: String,
    mature: bool,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl HordeClient {
    /// Create a new client against the public network endpoint.
    pub fn new(http: Client, mature: bool) -> Self {
        Self::with_base_url(http, mature, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(http: Client, mature: bool, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            mature,
            poll_interval: POLL_INTERVAL,
            max_poll_attempts: MAX_POLL_ATTEMPTS,
        }
    }

    /// Override the poll cadence (for testing; the production ceiling is
    /// 150 attempts at 2 s).
    pub fn poll_policy(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = interval;
        self.max_poll_attempts = max_attempts;
        self
    }

    async fn submit(&self, req: &GenerationRequest) -> Result<String> {
        let body = SubmitRequest {
            prompt: prompt::flatten(req),
            params: SubmitParams {
                max_length: req.sampling.max_output_length,
                temperature: req.sampling.temperature,
                top_p: req.sampling.nucleus_p,
                rep_pen: req.sampling.repetition_penalty,
            },
            models: ACCEPTED_MODELS.iter().map(|m| m.to_string()).collect(),
            nsfw: self.mature,
        };

        let url = format!("{}/v2/generate/text/async", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", ANONYMOUS_API_KEY)
            .timeout(SUBMIT_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(&self.base_url, "job submit", SUBMIT_TIMEOUT, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BragiError::Api {
                status: status.as_u16(),
                message: format!("job submit rejected by {}", self.base_url),
            });
        }

        let reply: SubmitReply = response
            .json()
            .await
            .map_err(|e| BragiError::Http(e.to_string()))?;
        Ok(reply.id)
    }

    async fn poll_status(&self, id: &str) -> Result<StatusReply> {
        let url = format!("{}/v2/generate/text/status/{}", self.base_url, id);
        let response = self
            .http
            .get(&url)
            .header("apikey", ANONYMOUS_API_KEY)
            .timeout(SUBMIT_TIMEOUT)
            .send()
            .await
            .map_err(|e| map_send_error(&self.base_url, "job poll", SUBMIT_TIMEOUT, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BragiError::Api {
                status: status.as_u16(),
                message: format!("status poll rejected by {}", self.base_url),
            });
        }

        response
            .json()
            .await
            .map_err(|e| BragiError::Http(e.to_string()))
    }
}

#[async_trait]
impl CompletionBackend for HordeClient {
    fn name(&self) -> &str {
        "horde"
    }

    async fn generate(&self, req: &GenerationRequest) -> Result<String> {
        let id = self.submit(req).await?;
        let submitted_at = std::time::Instant::now();
        debug!(job = %id, "job submitted to distributed network");

        for attempt in 0..self.max_poll_attempts {
            let status = self.poll_status(&id).await?;
            metrics::counter!(telemetry::POLL_TICKS_TOTAL).increment(1);

            if status.faulted {
                return Err(BragiError::Api {
                    status: 500,
                    message: format!("job {id} faulted on the network"),
                });
            }
            if status.done {
                let text = status
                    .generations
                    .into_iter()
                    .map(|g| g.text)
                    .find(|t| !t.trim().is_empty())
                    .ok_or(BragiError::EmptyResult)?;
                debug!(
                    job = %id,
                    attempt,
                    elapsed_ms = submitted_at.elapsed().as_millis() as u64,
                    "job completed"
                );
                return Ok(text.trim().to_string());
            }

            if attempt + 1 < self.max_poll_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        Err(BragiError::GenerationTimeout {
            operation: "distributed network poll",
            limit: self.poll_interval * self.max_poll_attempts,
        })
    }
}

#[derive(Serialize)]
struct SubmitRequest {
    prompt: String,
    params: SubmitParams,
    models: Vec<String>,
    nsfw: bool,
}

#[derive(Serialize)]
struct SubmitParams {
    max_length: u32,
    temperature: f32,
    top_p: f32,
    rep_pen: f32,
}

#[derive(Deserialize)]
struct SubmitReply {
    id: String,
}

#[derive(Deserialize)]
struct StatusReply {
    done: bool,
    #[serde(default)]
    faulted: bool,
    #[serde(default)]
    generations: Vec<GenerationEntry>,
}

#[derive(Deserialize)]
struct GenerationEntry {
    text: String,
}
