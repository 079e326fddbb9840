//! Turn selection under a fixed message budget.

use crate::types::{ConversationTurn, Role};

use super::summary::summarize;

/// Topical terms that mark a turn as worth keeping even when old.
const TOPICAL_KEYWORDS: &[&str] = &[
    "love", "feel", "heart", "remember", "memory", "family", "friend", "name", "promise",
    "secret", "afraid", "scared", "happy", "sad", "angry", "miss", "together", "first",
    "always", "never", "dream", "home", "trust",
];

const KEYWORD_WEIGHT: f64 = 2.0;

/// Longer turns carry more of the story; scored in buckets, largest first.
const LENGTH_BUCKETS: &[(usize, f64)] = &[(200, 3.0), (100, 2.0), (50, 1.0)];

/// Substantial assistant turns hold the character's own established voice.
const ASSISTANT_LENGTH_THRESHOLD: usize = 80;
const ASSISTANT_BONUS: f64 = 1.0;

/// The bounded window handed to prompt assembly.
///
/// `kept` is always in original chronological order; `summary` is
/// conceptually prepended before the kept turns when assembled.
#[derive(Debug, Clone)]
pub struct ContextWindow {
    pub kept: Vec<ConversationTurn>,
    pub summary: String,
}

/// Select which turns to keep verbatim under `budget`, and summarize the
/// full history.
///
/// When the history fits the budget it is returned whole with an empty
/// summary. Otherwise the most recent half of the budget is reserved
/// unconditionally (recency dominates relevance) and the remainder goes
/// to the highest-scoring earlier turns, restored to chronological order.
pub fn select(turns: &[ConversationTurn], budget: usize) -> ContextWindow {
    if turns.len() <= budget {
        return ContextWindow {
            kept: turns.to_vec(),
            summary: String::new(),
        };
    }

    let recent_count = budget / 2;
    let boundary = turns.len() - recent_count;
    let earlier = &turns[..boundary];
    let remaining = budget - recent_count;

    let mut scored: Vec<(usize, f64)> = earlier
        .iter()
        .enumerate()
        .map(|(idx, turn)| (idx, score_turn(turn, idx, earlier.len())))
        .collect();
    // Highest score first; ties go to the more recent turn.
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.0.cmp(&a.0))
    });

    let mut keep: Vec<usize> = scored.into_iter().take(remaining).map(|(idx, _)| idx).collect();
    keep.sort_unstable();

    let mut kept: Vec<ConversationTurn> = keep.into_iter().map(|idx| earlier[idx].clone()).collect();
    kept.extend(turns[boundary..].iter().cloned());

    ContextWindow {
        kept,
        summary: summarize(turns),
    }
}

fn score_turn(turn: &ConversationTurn, idx: usize, earlier_len: usize) -> f64 {
    let lower = turn.text.to_lowercase();

    let mut score = TOPICAL_KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(*keyword))
        .count() as f64
        * KEYWORD_WEIGHT;

    score += LENGTH_BUCKETS
        .iter()
        .find(|(min_len, _)| turn.text.len() >= *min_len)
        .map(|(_, weight)| *weight)
        .unwrap_or(0.0);

    if turn.role == Role::Assistant && turn.text.len() >= ASSISTANT_LENGTH_THRESHOLD {
        score += ASSISTANT_BONUS;
    }

    // Small monotonic recency bonus within the earlier slice.
    score + idx as f64 / earlier_len as f64
}
