//! Hosted multi-model gateway adapter.
//!
//! Speaks a synchronous chat-style completion API: one message list
//! (system instruction + conversation turns) with sampling parameters
//! passed through. On HTTP 429 the call is retried exactly once after a
//! short delay; a second 429 surfaces as `RateLimited`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::map_send_error;
use super::traits::CompletionBackend;
use crate::telemetry;
use crate::types::{GenerationRequest, Role};
use crate::{BragiError, Result};

/// Default base URL for the hosted gateway.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api";

/// Default model routed to when the caller does not override it.
const DEFAULT_MODEL: &str = "gryphe/mythomax-l2-13b";

const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);
const RATE_LIMIT_DELAY: Duration = Duration::from_secs(5);

/// Stop sequences keyed by model-name fragment, for models known to run
/// past the end of a reply without them.
const STOP_SEQUENCES: &[(&str, &[&str])] = &[
    ("mythomax", &["</s>", "### Instruction:"]),
    ("mythalion", &["<|user|>", "<|system|>"]),
    ("airoboros", &["USER:", "ASSISTANT:"]),
];

/// Client for the hosted multi-model gateway.
#[derive(Clone)]
pub struct HostedClient {
    credential: String,
    model: String,
    http: Client,
    base_url: String,
}

impl HostedClient {
    /// Create a new hosted client with the given credential.
    pub fn new(http: Client, credential: impl Into<String>) -> Self {
        Self::with_base_url(http, credential, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(
        http: Client,
        credential: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            credential: credential.into(),
            model: DEFAULT_MODEL.to_string(),
            http,
            base_url: base_url.into(),
        }
    }

    /// Route requests to a specific model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn stop_sequences(&self) -> Option<Vec<String>> {
        let model = self.model.to_lowercase();
        STOP_SEQUENCES
            .iter()
            .find(|(fragment, _)| model.contains(fragment))
            .map(|(_, stops)| stops.iter().map(|s| s.to_string()).collect())
    }

    async fn dispatch(&self, body: &ChatCompletionRequest<'_>) -> Result<reqwest::Response> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        self.http
            .post(&url)
            .bearer_auth(&self.credential)
            .timeout(GENERATION_TIMEOUT)
            .json(body)
            .send()
            .await
            .map_err(|e| map_send_error(&self.base_url, "hosted generation", GENERATION_TIMEOUT, e))
    }

    async fn read_text(&self, response: reqwest::Response) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            return Err(BragiError::Api {
                status: status.as_u16(),
                message: format!("hosted gateway error from {}", self.base_url),
            });
        }

        let reply: ChatCompletionReply = response
            .json()
            .await
            .map_err(|e| BragiError::Http(e.to_string()))?;

        let text = reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(BragiError::EmptyResult);
        }
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl CompletionBackend for HostedClient {
    fn name(&self) -> &str {
        "hosted"
    }

    async fn generate(&self, req: &GenerationRequest) -> Result<String> {
        let mut messages = Vec::with_capacity(req.turns.len() + 1);
        messages.push(WireMessage {
            role: "system",
            content: &req.instruction,
        });
        for turn in &req.turns {
            messages.push(WireMessage {
                role: match turn.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                content: &turn.text,
            });
        }

        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: req.sampling.temperature,
            max_tokens: req.sampling.max_output_length,
            top_p: req.sampling.nucleus_p,
            repetition_penalty: req.sampling.repetition_penalty,
            stop: self.stop_sequences(),
        };

        let response = self.dispatch(&body).await?;
        if response.status().as_u16() != 429 {
            return self.read_text(response).await;
        }

        // Single retry on 429, honouring a retry-after hint when present.
        let retry_after = parse_retry_after(&response);
        let delay = retry_after.unwrap_or(RATE_LIMIT_DELAY);
        warn!(
            delay_ms = delay.as_millis() as u64,
            "hosted gateway rate limited, retrying once"
        );
        metrics::counter!(telemetry::RETRIES_TOTAL,
            "provider" => "hosted",
            "operation" => "generate",
        )
        .increment(1);
        tokio::time::sleep(delay).await;

        let retried = self.dispatch(&body).await?;
        if retried.status().as_u16() == 429 {
            let retry_after = parse_retry_after(&retried);
            return Err(BragiError::RateLimited { retry_after });
        }
        self.read_text(retried).await
    }
}

fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    repetition_penalty: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionReply {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
