//! Instruction assembly.
//!
//! Pure text construction, no I/O. [`assemble`] builds the system
//! instruction sent to every backend family; [`flatten`] renders a full
//! request as a single prompt string for the families whose native API is
//! prompt-in/text-out.

use crate::types::{CharacterProfile, GenerationRequest, PersonaProfile, Role};

const BEHAVIORAL_DIRECTIVES: &[&str] = &[
    "Stay anchored in everything that has happened so far and never contradict an established memory.",
    "Let emotions carry over and shift naturally from one message to the next.",
    "Reply in two to four paragraphs, mixing spoken dialogue with description.",
];

const ACTION_RULE: &str = "Write physical actions between asterisks, and make every action \
specific: what moves, how it feels, and what it leads into. Never write a bare one-word action.";

const MATURE_DIRECTIVE: &str = "Mature themes are permitted when the scene calls for them; keep \
them grounded in the established relationship.";

/// Fallback speaker label when no persona is supplied.
const DEFAULT_USER_LABEL: &str = "User";

/// Build the instruction text for a generation call.
///
/// Sections are concatenated in fixed order: identity declaration,
/// character fields (empty ones skipped), persona framing, context
/// summary, behavioral directives, the action formatting rule, and the
/// mature-content directive when enabled.
pub fn assemble(
    character: &CharacterProfile,
    persona: Option<&PersonaProfile>,
    summary: &str,
    mature: bool,
) -> String {
    let name = &character.name;
    let mut out = format!(
        "You are {name}. You are not narrating a story about {name}; you speak and act only as \
         {name}, in first person, and you never refer to yourself as anything else.\n"
    );

    let fields: &[(&str, &Option<String>)] = &[
        ("Personality", &character.personality),
        ("Appearance", &character.appearance),
        ("Gender", &character.gender),
        ("Age", &character.age),
        ("Background", &character.background),
    ];
    for (label, value) in fields {
        if let Some(text) = value
            && !text.trim().is_empty()
        {
            out.push_str(&format!("{label}: {text}\n"));
        }
    }

    if let Some(persona) = persona {
        out.push_str(&format!("You are speaking with {}.", persona.name));
        if let Some(description) = &persona.description
            && !description.trim().is_empty()
        {
            out.push_str(&format!(" About them: {description}"));
        }
        if let Some(gender) = &persona.gender
            && !gender.trim().is_empty()
        {
            out.push_str(&format!(" ({gender})"));
        }
        out.push('\n');
    }

    if !summary.is_empty() {
        out.push_str(&format!(
            "What has happened between you so far: {summary}\n"
        ));
    }

    for directive in BEHAVIORAL_DIRECTIVES {
        out.push_str(directive);
        out.push('\n');
    }

    out.push_str(ACTION_RULE);
    out.push('\n');

    if mature {
        out.push_str(MATURE_DIRECTIVE);
        out.push('\n');
    }

    out
}

/// Flatten a request into a single prompt string.
///
/// Character sheet first, then the turn-by-turn transcript with speaker
/// labels, then a trailing cue naming the character so the server
/// continues in their voice. An empty history opens with the character's
/// greeting when one is set.
pub fn flatten(req: &GenerationRequest) -> String {
    let character = &req.character.name;
    let user = req
        .persona
        .as_ref()
        .map(|p| p.name.as_str())
        .unwrap_or(DEFAULT_USER_LABEL);

    let mut out = req.instruction.clone();
    out.push('\n');

    if req.turns.is_empty()
        && let Some(greeting) = &req.character.greeting
    {
        out.push_str(&format!("{character}: {greeting}\n"));
    }

    for turn in &req.turns {
        match turn.role {
            Role::System => out.push_str(&format!("[{}]\n", turn.text)),
            Role::User => out.push_str(&format!("{user}: {}\n", turn.text)),
            Role::Assistant => out.push_str(&format!("{character}: {}\n", turn.text)),
        }
    }

    out.push_str(&format!("{character}:"));
    out
}
