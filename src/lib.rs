//! Bragi - Resilient character-dialogue client for interchangeable LLM backends
//!
//! This crate produces long-form character-driven text by dispatching
//! generation requests to one of three interchangeable backend families
//! (a hosted multi-model gateway, a locally-run inference server, or a
//! public distributed inference network), while compressing an unbounded
//! conversation history into a bounded prompt and enforcing content-shape
//! rules on the output.
//!
//! # Example
//!
//! ```rust,no_run
//! use bragi::{Bragi, CharacterProfile, ConversationTurn};
//!
//! #[tokio::main]
//! async fn main() -> bragi::Result<()> {
//!     let client = Bragi::builder()
//!         .hosted_credential("sk-or-your-key")
//!         .build();
//!
//!     let character = CharacterProfile::new("Mira")
//!         .personality("wry, protective, slow to trust")
//!         .greeting("So you came back after all.");
//!
//!     let history = vec![ConversationTurn::user("I did. I keep my promises.")];
//!
//!     let reply = client.generate_response(&character, &history, None).await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```
//!
//! Backend choice is automatic: a configured hosted credential wins, then
//! a discovered local server, then the distributed network as the fallback
//! that never fails to resolve. [`BragiClient::switch_backend`] changes
//! family explicitly at runtime.

pub mod context;
pub mod discovery;
pub mod error;
pub mod gateway;
pub mod postprocess;
pub mod prompt;
pub mod providers;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use error::{BragiError, Result};
pub use gateway::{Bragi, BragiBuilder, BragiClient, Generation};
pub use providers::CompletionBackend;

// Re-export all types
pub use context::ContextWindow;
pub use types::{
    BackendFamily, CharacterProfile, ConversationTurn, GenerationRequest, PersonaProfile,
    ProviderState, Role, SamplingParams,
};
