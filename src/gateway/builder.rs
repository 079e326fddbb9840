//! Builder for configuring the generation facade

use super::client::BragiClient;
use crate::providers::{ProviderResolver, ResolverConfig};
use crate::providers::{horde, hosted};
use crate::types::SamplingParams;

/// Default message budget for the context window.
const DEFAULT_CONTEXT_BUDGET: usize = 20;

/// Main entry point for creating facade instances.
pub struct Bragi;

impl Bragi {
    /// Create a new builder for configuring the facade.
    pub fn builder() -> BragiBuilder {
        BragiBuilder::new()
    }
}

/// Builder for configuring facade instances.
///
/// The recognized options are the hosted-gateway credential, an explicit
/// local endpoint override, the mature-content flag, and sampling
/// overrides; base-URL setters exist for testing against mock servers.
pub struct BragiBuilder {
    hosted_credential: Option<String>,
    hosted_model: Option<String>,
    hosted_base_url: String,
    local_endpoint: Option<String>,
    distributed_base_url: String,
    hosted_runtime: bool,
    mature: bool,
    sampling: SamplingParams,
    context_budget: usize,
}

impl BragiBuilder {
    pub fn new() -> Self {
        Self {
            hosted_credential: None,
            hosted_model: None,
            hosted_base_url: hosted::DEFAULT_BASE_URL.to_string(),
            local_endpoint: None,
            distributed_base_url: horde::DEFAULT_BASE_URL.to_string(),
            hosted_runtime: false,
            mature: false,
            sampling: SamplingParams::default(),
            context_budget: DEFAULT_CONTEXT_BUDGET,
        }
    }

    /// Configure the hosted-gateway credential. Its presence alone selects
    /// the hosted family during resolution.
    pub fn hosted_credential(mut self, credential: impl Into<String>) -> Self {
        self.hosted_credential = Some(credential.into());
        self
    }

    /// Route hosted requests to a specific model.
    pub fn hosted_model(mut self, model: impl Into<String>) -> Self {
        self.hosted_model = Some(model.into());
        self
    }

    /// Override the hosted gateway base URL (for testing with wiremock).
    pub fn hosted_base_url(mut self, url: impl Into<String>) -> Self {
        self.hosted_base_url = url.into();
        self
    }

    /// Pin the local-compatible endpoint instead of discovering one.
    pub fn local_endpoint(mut self, url: impl Into<String>) -> Self {
        self.local_endpoint = Some(url.into());
        self
    }

    /// Override the distributed network base URL (for testing with
    /// wiremock).
    pub fn distributed_base_url(mut self, url: impl Into<String>) -> Self {
        self.distributed_base_url = url.into();
        self
    }

    /// Declare that we run in a hosted (non-local) execution context,
    /// enabling the public-instance sweep during resolution.
    pub fn hosted_runtime(mut self, enabled: bool) -> Self {
        self.hosted_runtime = enabled;
        self
    }

    /// Allow mature content in prompts and distributed-network jobs.
    pub fn mature(mut self, enabled: bool) -> Self {
        self.mature = enabled;
        self
    }

    /// Override the default sampling parameters.
    pub fn sampling(mut self, params: SamplingParams) -> Self {
        self.sampling = params;
        self
    }

    /// Set the context window budget in turns.
    pub fn context_budget(mut self, turns: usize) -> Self {
        self.context_budget = turns;
        self
    }

    /// Build the facade.
    ///
    /// Infallible: resolution always terminates in a usable state, so
    /// there is no invalid configuration to reject.
    pub fn build(self) -> BragiClient {
        let http = reqwest::Client::new();

        let resolver = ProviderResolver::new(
            http.clone(),
            ResolverConfig {
                hosted_credential_present: self.hosted_credential.is_some(),
                hosted_endpoint: self.hosted_base_url,
                local_endpoint_override: self.local_endpoint,
                hosted_runtime: self.hosted_runtime,
                distributed_endpoint: self.distributed_base_url,
            },
        );

        BragiClient::new(
            http,
            resolver,
            self.hosted_credential,
            self.hosted_model,
            self.mature,
            self.sampling,
            self.context_budget,
        )
    }
}

impl Default for BragiBuilder {
    fn default() -> Self {
        Self::new()
    }
}
