//! Generation request and provider state types

use serde::{Deserialize, Serialize};

use super::profile::{CharacterProfile, PersonaProfile};
use super::turn::ConversationTurn;

/// One of the three interchangeable generation services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendFamily {
    Hosted,
    LocalCompatible,
    DistributedNetwork,
}

impl BackendFamily {
    /// Short name used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendFamily::Hosted => "hosted",
            BackendFamily::LocalCompatible => "local",
            BackendFamily::DistributedNetwork => "horde",
        }
    }
}

/// Which backend family is active and where it lives.
///
/// Single-writer: only the resolver mutates this. Adapters receive a
/// by-value copy captured at request start, so an in-flight request always
/// sees a consistent endpoint/family pairing even across `switch_to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderState {
    pub family: BackendFamily,
    pub endpoint: String,
    pub credentials_present: bool,
    pub last_known_good: Option<String>,
}

/// Sampling parameters passed through to whichever backend is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f32,
    pub max_output_length: u32,
    pub nucleus_p: f32,
    pub repetition_penalty: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            max_output_length: 300,
            nucleus_p: 0.95,
            repetition_penalty: 1.1,
        }
    }
}

impl SamplingParams {
    pub fn temperature(mut self, t: f32) -> Self {
        self.temperature = t;
        self
    }

    pub fn max_output_length(mut self, n: u32) -> Self {
        self.max_output_length = n;
        self
    }

    pub fn nucleus_p(mut self, p: f32) -> Self {
        self.nucleus_p = p;
        self
    }

    pub fn repetition_penalty(mut self, p: f32) -> Self {
        self.repetition_penalty = p;
        self
    }
}

/// A fully assembled generation request, constructed fresh per call.
///
/// `instruction` is the assembled system text; `turns` is the bounded
/// window selected by the context manager, already in chronological order.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub instruction: String,
    pub turns: Vec<ConversationTurn>,
    pub character: CharacterProfile,
    pub persona: Option<PersonaProfile>,
    pub sampling: SamplingParams,
}
