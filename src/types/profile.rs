//! Character and persona descriptors

use serde::{Deserialize, Serialize};

/// The character the backend is asked to speak as.
///
/// Immutable for the duration of one generation call. All fields except
/// `name` are free text and optional; empty fields are skipped during
/// prompt assembly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl CharacterProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn personality(mut self, text: impl Into<String>) -> Self {
        self.personality = Some(text.into());
        self
    }

    pub fn appearance(mut self, text: impl Into<String>) -> Self {
        self.appearance = Some(text.into());
        self
    }

    pub fn gender(mut self, text: impl Into<String>) -> Self {
        self.gender = Some(text.into());
        self
    }

    pub fn age(mut self, text: impl Into<String>) -> Self {
        self.age = Some(text.into());
        self
    }

    pub fn greeting(mut self, text: impl Into<String>) -> Self {
        self.greeting = Some(text.into());
        self
    }

    pub fn background(mut self, text: impl Into<String>) -> Self {
        self.background = Some(text.into());
        self
    }
}

/// The counterpart identity the user is speaking as.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonaProfile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl PersonaProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn gender(mut self, text: impl Into<String>) -> Self {
        self.gender = Some(text.into());
        self
    }
}
