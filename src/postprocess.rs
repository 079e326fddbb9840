//! Output post-processing.
//!
//! Two independent passes over generated text. The action-complexity pass
//! rewrites bare stage directions (`*waves*`) into multi-clause actions so
//! replies keep their physicality. The persona-consistency pass scans for
//! phrases that mean the backend broke character; it never alters the text,
//! it only reports the hits for future prompt tuning.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::telemetry;

/// Spans shorter than this are considered too thin and get elaborated.
pub const MIN_ACTION_WORDS: usize = 5;

static ACTION_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\n]+)\*").expect("action span pattern"));

/// Bare single-concept verbs and emotions that always read as filler.
const BARE_ACTIONS: &[&str] = &[
    "smiles", "waves", "nods", "laughs", "giggles", "blushes", "sighs", "shrugs", "winks",
    "grins", "frowns", "smirks", "chuckles", "gasps", "cries", "pouts", "stares", "yawns",
    "stretches", "hugs",
];

/// Root verb to pre-written multi-clause elaboration.
const ELABORATIONS: &[(&str, &str)] = &[
    (
        "smiles",
        "smiles slowly, warmth spreading across their face while their eyes search yours",
    ),
    (
        "waves",
        "raises a hand and waves, then lets it drift back down while a shy smile crosses their face",
    ),
    (
        "nods",
        "nods once, slow and deliberate, while holding your gaze",
    ),
    (
        "laughs",
        "laughs brightly, shoulders shaking, then catches their breath while wiping one eye",
    ),
    (
        "giggles",
        "giggles behind a raised hand, then peeks over it to gauge your reaction",
    ),
    (
        "blushes",
        "blushes to the tips of their ears, then looks away while fighting down a smile",
    ),
    (
        "sighs",
        "lets out a long breath, shoulders sinking, then looks up at you while gathering the words",
    ),
    (
        "shrugs",
        "gives a small shrug, then tilts their head while weighing what to say next",
    ),
    (
        "winks",
        "winks at you, quick and conspiratorial, then leans back while a grin spreads",
    ),
    (
        "grins",
        "grins wide and unguarded, then ducks their head while the grin refuses to fade",
    ),
    (
        "frowns",
        "frowns faintly, brow creasing, then studies your face while the silence stretches",
    ),
    (
        "cries",
        "breaks into quiet tears, shoulders trembling, then wipes at them while trying to speak",
    ),
    (
        "hugs",
        "pulls you into a tight hug, arms wrapped firm, then holds on while breathing you in",
    ),
];

/// Appended to short spans with no table entry; keeps the result
/// multi-clause.
const GENERIC_TAIL: &str = ", then pauses for a breath while watching for your reaction";

/// Result of a post-processing run.
#[derive(Debug, Clone)]
pub struct Postprocessed {
    pub text: String,
    /// Break phrases found by the persona-consistency pass, lowercased.
    pub persona_breaks: Vec<String>,
}

/// Run both passes over generated text.
pub fn postprocess(text: &str) -> Postprocessed {
    let rewritten = rewrite_actions(text);
    let persona_breaks = scan_persona_breaks(&rewritten);
    if !persona_breaks.is_empty() {
        warn!(phrases = ?persona_breaks, "generated text broke character");
        metrics::counter!(telemetry::PERSONA_BREAKS_TOTAL).increment(persona_breaks.len() as u64);
    }
    Postprocessed {
        text: rewritten,
        persona_breaks,
    }
}

/// Rewrite action spans that fail the complexity bar.
///
/// Each span is replaced at most once, by exact-substring first match, and
/// replacements are computed from the original text only; already-replaced
/// text is never reprocessed, which keeps the pass idempotent.
pub fn rewrite_actions(text: &str) -> String {
    let mut out = text.to_string();
    for capture in ACTION_SPAN.captures_iter(text) {
        let span = &capture[0];
        let inner = &capture[1];
        if let Some(replacement) = elaborate(inner)
            && let Some(pos) = out.find(span)
        {
            out.replace_range(pos..pos + span.len(), &format!("*{replacement}*"));
        }
    }
    out
}

/// Decide whether a span needs elaboration and produce the replacement.
fn elaborate(inner: &str) -> Option<String> {
    let words: Vec<&str> = inner.split_whitespace().collect();
    let bare = words.len() <= 2
        && words
            .iter()
            .any(|w| BARE_ACTIONS.contains(&root_of(w).as_str()));
    if !bare && words.len() >= MIN_ACTION_WORDS {
        return None;
    }

    let root = words.first().map(|w| root_of(w)).unwrap_or_default();
    if let Some((_, elaboration)) = ELABORATIONS.iter().find(|(verb, _)| *verb == root) {
        return Some((*elaboration).to_string());
    }
    if words.len() < MIN_ACTION_WORDS && !words.is_empty() {
        return Some(format!("{}{GENERIC_TAIL}", inner.trim()));
    }
    None
}

/// Lowercase a word and strip surrounding punctuation.
fn root_of(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Phrases that indicate the backend dropped the character mask.
const BREAK_PHRASES: &[&str] = &[
    "as an ai",
    "as a language model",
    "as an artificial intelligence",
    "i am an ai",
    "i'm an ai",
    "i am a language model",
    "large language model",
    "my programming",
    "i cannot roleplay",
    "i'm just a computer program",
    "openai",
];

/// Scan for character-break phrases, case-insensitive.
///
/// The text is never altered on a match; hits are reported for diagnostics
/// only.
pub fn scan_persona_breaks(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    BREAK_PHRASES
        .iter()
        .filter(|phrase| lower.contains(*phrase))
        .map(|phrase| phrase.to_string())
        .collect()
}
