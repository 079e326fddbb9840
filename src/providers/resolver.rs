//! Backend family resolution and explicit switching.
//!
//! The resolver owns the only mutable [`ProviderState`] in the process.
//! `resolve()` is memoized: the first caller runs the decision policy and
//! later callers get the settled state; concurrent callers suspend on the
//! same lock until resolution finishes. `switch_to()` atomically replaces
//! the state, so an in-flight request that captured the old state by value
//! is never torn.

use tokio::sync::Mutex;
use tracing::info;

use crate::discovery::{discover_local_endpoint, discover_public_endpoint, normalize_endpoint};
use crate::types::{BackendFamily, ProviderState};

/// Loopback candidate used when a forced local switch finds nothing.
const FALLBACK_LOCAL_ENDPOINT: &str = "http://127.0.0.1:5000";

/// Inputs to the resolution policy.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Whether a hosted-gateway credential was configured.
    pub hosted_credential_present: bool,
    /// Hosted gateway base URL.
    pub hosted_endpoint: String,
    /// Explicit local endpoint override, skipping discovery.
    pub local_endpoint_override: Option<String>,
    /// Whether we run in a hosted (non-local) execution context, where a
    /// public instance sweep is worth attempting.
    pub hosted_runtime: bool,
    /// Fixed endpoint for the distributed network.
    pub distributed_endpoint: String,
}

/// Chooses which backend family to use and owns reinitialization when the
/// caller switches backend explicitly.
pub struct ProviderResolver {
    http: reqwest::Client,
    config: ResolverConfig,
    state: Mutex<Option<ProviderState>>,
}

impl ProviderResolver {
    pub fn new(http: reqwest::Client, config: ResolverConfig) -> Self {
        Self {
            http,
            config,
            state: Mutex::new(None),
        }
    }

    /// Resolve the active provider, running the decision policy at most
    /// once until [`switch_to`](Self::switch_to) forces re-entry.
    ///
    /// Never fails: the worst case selects the distributed network, whose
    /// endpoint is fixed.
    pub async fn resolve(&self) -> ProviderState {
        let mut slot = self.state.lock().await;
        if let Some(state) = slot.as_ref() {
            return state.clone();
        }
        let state = self.resolve_fresh().await;
        info!(
            family = state.family.as_str(),
            endpoint = %state.endpoint,
            "provider resolved"
        );
        *slot = Some(state.clone());
        state
    }

    /// Decision policy, in order: hosted credential, explicit local
    /// override, local discovery, public-instance discovery (hosted
    /// runtimes only), distributed network.
    async fn resolve_fresh(&self) -> ProviderState {
        if self.config.hosted_credential_present {
            return ProviderState {
                family: BackendFamily::Hosted,
                endpoint: self.config.hosted_endpoint.clone(),
                credentials_present: true,
                last_known_good: None,
            };
        }

        if let Some(raw) = &self.config.local_endpoint_override {
            let endpoint = normalize_endpoint(raw);
            return ProviderState {
                family: BackendFamily::LocalCompatible,
                endpoint: endpoint.clone(),
                credentials_present: false,
                last_known_good: Some(endpoint),
            };
        }

        if let Some(endpoint) = discover_local_endpoint(&self.http).await {
            return ProviderState {
                family: BackendFamily::LocalCompatible,
                endpoint: endpoint.clone(),
                credentials_present: false,
                last_known_good: Some(endpoint),
            };
        }

        if self.config.hosted_runtime
            && let Some(endpoint) = discover_public_endpoint(&self.http).await
        {
            return ProviderState {
                family: BackendFamily::LocalCompatible,
                endpoint: endpoint.clone(),
                credentials_present: false,
                last_known_good: Some(endpoint),
            };
        }

        ProviderState {
            family: BackendFamily::DistributedNetwork,
            endpoint: self.config.distributed_endpoint.clone(),
            credentials_present: false,
            last_known_good: None,
        }
    }

    /// Atomically replace the active provider.
    ///
    /// A forced local switch without an explicit endpoint re-runs
    /// discovery, then falls back to the last known good endpoint, then to
    /// the default loopback candidate, so the switch always lands in a
    /// usable state. Any unreachability surfaces as a typed error on the
    /// next generation call.
    pub async fn switch_to(
        &self,
        family: BackendFamily,
        explicit_endpoint: Option<String>,
    ) -> ProviderState {
        let mut slot = self.state.lock().await;
        let last_known_good = slot.as_ref().and_then(|s| s.last_known_good.clone());

        let state = match family {
            BackendFamily::Hosted => ProviderState {
                family,
                endpoint: explicit_endpoint
                    .unwrap_or_else(|| self.config.hosted_endpoint.clone()),
                credentials_present: self.config.hosted_credential_present,
                last_known_good,
            },
            BackendFamily::LocalCompatible => {
                let endpoint = match explicit_endpoint {
                    Some(raw) => normalize_endpoint(&raw),
                    None => match discover_local_endpoint(&self.http).await {
                        Some(found) => found,
                        None => last_known_good
                            .clone()
                            .unwrap_or_else(|| FALLBACK_LOCAL_ENDPOINT.to_string()),
                    },
                };
                ProviderState {
                    family,
                    endpoint: endpoint.clone(),
                    credentials_present: false,
                    last_known_good: Some(endpoint),
                }
            }
            BackendFamily::DistributedNetwork => ProviderState {
                family,
                endpoint: explicit_endpoint
                    .unwrap_or_else(|| self.config.distributed_endpoint.clone()),
                credentials_present: false,
                last_known_good,
            },
        };

        info!(
            family = state.family.as_str(),
            endpoint = %state.endpoint,
            "provider switched"
        );
        *slot = Some(state.clone());
        state
    }
}
