//! Protocol adapters for the three backend families.
//!
//! Each adapter translates a [`GenerationRequest`](crate::GenerationRequest)
//! into its backend's native wire format: a structured chat-message call
//! (hosted), a flattened prompt-in/text-out call (local-compatible), or a
//! submit-then-poll job pair (distributed network). Adapters own their own
//! failure translation and return plain text; persona post-processing
//! happens downstream in the facade.

pub mod horde;
pub mod hosted;
pub mod local;
pub mod resolver;
pub mod traits;

pub use horde::HordeClient;
pub use hosted::HostedClient;
pub use local::LocalClient;
pub use resolver::{ProviderResolver, ResolverConfig};
pub use traits::CompletionBackend;

use std::time::Duration;

use crate::BragiError;

/// Map a low-level send failure to an endpoint-aware error kind.
pub(crate) fn map_send_error(
    endpoint: &str,
    operation: &'static str,
    limit: Duration,
    err: reqwest::Error,
) -> BragiError {
    if err.is_timeout() {
        BragiError::GenerationTimeout { operation, limit }
    } else if err.is_connect() {
        BragiError::EndpointUnreachable {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        }
    } else {
        BragiError::Http(err.to_string())
    }
}
