//! Backend adapter trait.
//!
//! All three protocol adapters share one signature: a generation request
//! in, plain text out. Failure translation is the adapter's job; callers
//! see only the typed error kinds in [`BragiError`](crate::BragiError).

use async_trait::async_trait;

use crate::Result;
use crate::types::GenerationRequest;

/// A backend capable of turning a generation request into text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Backend name for logging/debugging.
    fn name(&self) -> &str;

    /// Generate a completion for the request.
    async fn generate(&self, req: &GenerationRequest) -> Result<String>;
}
