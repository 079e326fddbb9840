//! Local-compatible inference server adapter.
//!
//! This family's native API is prompt-in/text-out, so the adapter builds a
//! single flattened prompt (character sheet, transcript, trailing cue)
//! instead of a structured message list. A lightweight health check runs
//! before every generation and fails fast when the endpoint is down or has
//! no model loaded.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::map_send_error;
use super::traits::CompletionBackend;
use crate::discovery::IDLE_MODEL;
use crate::prompt;
use crate::types::GenerationRequest;
use crate::{BragiError, Result};

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
const GENERATION_TIMEOUT: Duration = Duration::from_secs(45);

/// Client for a local-compatible inference server.
///
/// Cheap to construct: it captures the endpoint by value at request start
/// and shares the HTTP connection pool it is given.
#[derive(Clone)]
pub struct LocalClient {
    http: Client,
    base_url: String,
}

impl LocalClient {
    /// Create a client for the given endpoint.
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Check that the server is reachable and has a model loaded.
    ///
    /// Returns the loaded model name.
    pub async fn check_model(&self) -> Result<String> {
        let url = format!("{}/api/v1/model", self.base_url);
        let response = self
            .http
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| BragiError::EndpointUnreachable {
                endpoint: self.base_url.clone(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(BragiError::EndpointUnreachable {
                endpoint: self.base_url.clone(),
                reason: format!("health check returned {}", response.status()),
            });
        }

        let reply: ModelReply = response
            .json()
            .await
            .map_err(|e| BragiError::Http(e.to_string()))?;

        if reply.result.is_empty() || reply.result == IDLE_MODEL {
            return Err(BragiError::NoModelLoaded {
                endpoint: self.base_url.clone(),
            });
        }
        Ok(reply.result)
    }
}

#[async_trait]
impl CompletionBackend for LocalClient {
    fn name(&self) -> &str {
        "local"
    }

    async fn generate(&self, req: &GenerationRequest) -> Result<String> {
        let model = self.check_model().await?;
        debug!(endpoint = %self.base_url, model = %model, "local server healthy");

        let body = LocalGenerateRequest {
            prompt: prompt::flatten(req),
            max_length: req.sampling.max_output_length,
            temperature: req.sampling.temperature,
            top_p: req.sampling.nucleus_p,
            rep_pen: req.sampling.repetition_penalty,
        };

        let url = format!("{}/api/v1/generate", self.base_url);
        let response = self
            .http
            .post(&url)
            .timeout(GENERATION_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(&self.base_url, "local generation", GENERATION_TIMEOUT, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BragiError::Api {
                status: status.as_u16(),
                message: format!("local server error from {}", self.base_url),
            });
        }

        let reply: LocalGenerateReply = response
            .json()
            .await
            .map_err(|e| BragiError::Http(e.to_string()))?;

        let text = reply
            .results
            .into_iter()
            .map(|r| r.text)
            .find(|t| !t.trim().is_empty())
            .ok_or(BragiError::EmptyResult)?;
        Ok(text.trim().to_string())
    }
}

#[derive(Deserialize)]
struct ModelReply {
    result: String,
}

#[derive(Serialize)]
struct LocalGenerateRequest {
    prompt: String,
    max_length: u32,
    temperature: f32,
    top_p: f32,
    rep_pen: f32,
}

#[derive(Deserialize)]
struct LocalGenerateReply {
    results: Vec<LocalGenerateResult>,
}

#[derive(Deserialize)]
struct LocalGenerateResult {
    text: String,
}
