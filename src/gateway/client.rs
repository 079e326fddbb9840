//! Facade orchestration: resolve, build, dispatch, post-process.

use std::time::Instant;

use tracing::debug;

use crate::context;
use crate::postprocess;
use crate::prompt;
use crate::providers::{
    CompletionBackend, HordeClient, HostedClient, LocalClient, ProviderResolver,
};
use crate::telemetry;
use crate::types::{
    BackendFamily, CharacterProfile, ConversationTurn, GenerationRequest, PersonaProfile,
    ProviderState, SamplingParams,
};
use crate::{BragiError, Result};

/// A finished generation plus its diagnostics.
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    /// Persona-break phrases flagged by the post-processor. The text is
    /// returned unaltered either way; callers decide what to do with a
    /// break (show it, tune the prompt, or regenerate).
    pub persona_breaks: Vec<String>,
}

/// The single entry point external callers use.
///
/// Construct with [`Bragi::builder()`](super::Bragi::builder) and inject
/// wherever generations are needed; one instance per process is typical
/// but nothing here is global.
pub struct BragiClient {
    http: reqwest::Client,
    resolver: ProviderResolver,
    hosted_credential: Option<String>,
    hosted_model: Option<String>,
    mature: bool,
    sampling: SamplingParams,
    context_budget: usize,
}

impl BragiClient {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        http: reqwest::Client,
        resolver: ProviderResolver,
        hosted_credential: Option<String>,
        hosted_model: Option<String>,
        mature: bool,
        sampling: SamplingParams,
        context_budget: usize,
    ) -> Self {
        Self {
            http,
            resolver,
            hosted_credential,
            hosted_model,
            mature,
            sampling,
            context_budget,
        }
    }

    /// Generate the character's next reply.
    ///
    /// Serializing calls for one conversation is the caller's job; the
    /// facade neither queues nor interleaves them.
    pub async fn generate_response(
        &self,
        character: &CharacterProfile,
        turns: &[ConversationTurn],
        persona: Option<&PersonaProfile>,
    ) -> Result<String> {
        self.generate_with_diagnostics(character, turns, persona)
            .await
            .map(|generation| generation.text)
    }

    /// Like [`generate_response`](Self::generate_response), but also
    /// returns post-processor diagnostics.
    pub async fn generate_with_diagnostics(
        &self,
        character: &CharacterProfile,
        turns: &[ConversationTurn],
        persona: Option<&PersonaProfile>,
    ) -> Result<Generation> {
        // Suspends until resolution settles; memoized after the first call.
        let state = self.resolver.resolve().await;

        let window = context::select(turns, self.context_budget);
        debug!(
            total = turns.len(),
            kept = window.kept.len(),
            summarized = !window.summary.is_empty(),
            "context window selected"
        );

        let instruction = prompt::assemble(character, persona, &window.summary, self.mature);
        let req = GenerationRequest {
            instruction,
            turns: window.kept,
            character: character.clone(),
            persona: persona.cloned(),
            sampling: self.sampling.clone(),
        };

        let provider = state.family.as_str();
        let started = Instant::now();
        let outcome = self.dispatch(&state, &req).await;
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "provider" => provider)
            .record(started.elapsed().as_secs_f64());
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "provider" => provider,
            "status" => if outcome.is_ok() { "ok" } else { "error" },
        )
        .increment(1);

        let raw = outcome?;
        let processed = postprocess::postprocess(&raw);
        Ok(Generation {
            text: processed.text,
            persona_breaks: processed.persona_breaks,
        })
    }

    /// Resolve (or return the already-resolved) provider state.
    ///
    /// Safe to call once at startup to warm resolution ahead of the first
    /// generation; `generate_response` does the same lazily.
    pub async fn provider_state(&self) -> ProviderState {
        self.resolver.resolve().await
    }

    /// Explicitly switch backend family, forcing re-resolution.
    ///
    /// In-flight generations keep the state they captured at request
    /// start; only subsequent calls see the new family.
    pub async fn switch_backend(
        &self,
        family: BackendFamily,
        explicit_endpoint: Option<String>,
    ) -> ProviderState {
        self.resolver.switch_to(family, explicit_endpoint).await
    }

    /// Dispatch to the adapter for the captured provider state.
    ///
    /// Adapters are constructed per call against `state.endpoint`, so a
    /// switch landing mid-request can never tear the endpoint/family
    /// pairing. Construction is cheap: every adapter shares the facade's
    /// HTTP connection pool.
    async fn dispatch(&self, state: &ProviderState, req: &GenerationRequest) -> Result<String> {
        match state.family {
            BackendFamily::Hosted => {
                let credential = self
                    .hosted_credential
                    .as_ref()
                    .ok_or(BragiError::NoCredentials)?;
                let hosted =
                    HostedClient::with_base_url(self.http.clone(), credential, &state.endpoint);
                let hosted = match &self.hosted_model {
                    Some(model) => hosted.model(model),
                    None => hosted,
                };
                hosted.generate(req).await
            }
            BackendFamily::LocalCompatible => {
                LocalClient::new(self.http.clone(), state.endpoint.clone())
                    .generate(req)
                    .await
            }
            BackendFamily::DistributedNetwork => {
                HordeClient::with_base_url(self.http.clone(), self.mature, &state.endpoint)
                    .generate(req)
                    .await
            }
        }
    }
}
