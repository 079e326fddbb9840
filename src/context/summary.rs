//! Prose summary of the full conversation history.
//!
//! The summary scans every turn for category triggers and condenses the
//! hits into a couple of sentences, tagging each category as recent or
//! past depending on where its last hit falls relative to the final turns.

use crate::types::ConversationTurn;

/// Histories shorter than this are left unsummarized.
pub const SUMMARY_MIN_TURNS: usize = 15;

/// Hits inside the final window count as recent developments.
const RECENT_WINDOW: usize = 10;

struct SummaryCategory {
    keywords: &'static [&'static str],
    clause: &'static str,
}

const CATEGORIES: &[SummaryCategory] = &[
    SummaryCategory {
        keywords: &[
            "my name is", "i am from", "i'm from", "years old", "i work", "i live", "my family",
            "grew up",
        ],
        clause: "personal facts about name, age, or origin were shared",
    },
    SummaryCategory {
        keywords: &[
            "love you", "first kiss", "kissed", "be together", "marry", "girlfriend", "boyfriend",
            "confess", "be mine",
        ],
        clause: "the relationship reached a new milestone",
    },
    SummaryCategory {
        keywords: &[
            "so happy", "overjoyed", "scared", "afraid", "terrified", "angry", "furious", "cried",
            "crying", "grief", "heartbroken", "miss you",
        ],
        clause: "strong emotions surfaced",
    },
    SummaryCategory {
        keywords: &["secret", "promise", "anniversary", "birthday", "surprise", "swear"],
        clause: "secrets or promises were exchanged",
    },
    SummaryCategory {
        keywords: &["i like", "i love", "i hate", "favorite", "i enjoy", "i prefer", "can't stand"],
        clause: "personal tastes and traits came up",
    },
    SummaryCategory {
        keywords: &[
            "we went", "we did", "together we", "remember when", "our trip", "our date",
            "that night we",
        ],
        clause: "they shared experiences together",
    },
    SummaryCategory {
        keywords: &["sorry", "forgive", "fight", "fought", "argue", "argument", "make it up"],
        clause: "there was conflict and reconciliation",
    },
];

/// Produce a prose summary of the whole history.
///
/// Empty until the history reaches [`SUMMARY_MIN_TURNS`]. Categories with
/// a hit inside the final [`RECENT_WINDOW`] turns are phrased as recent;
/// categories hit only earlier are phrased as past.
pub fn summarize(turns: &[ConversationTurn]) -> String {
    if turns.len() < SUMMARY_MIN_TURNS {
        return String::new();
    }

    let recent_boundary = turns.len().saturating_sub(RECENT_WINDOW);
    let mut recent: Vec<&str> = Vec::new();
    let mut past: Vec<&str> = Vec::new();

    for category in CATEGORIES {
        let mut hit_recent = false;
        let mut hit_past = false;
        for (idx, turn) in turns.iter().enumerate() {
            let lower = turn.text.to_lowercase();
            if category.keywords.iter().any(|k| lower.contains(k)) {
                if idx >= recent_boundary {
                    hit_recent = true;
                } else {
                    hit_past = true;
                }
            }
        }
        if hit_recent {
            recent.push(category.clause);
        } else if hit_past {
            past.push(category.clause);
        }
    }

    let mut out = String::new();
    if !past.is_empty() {
        out.push_str("Earlier in the story, ");
        out.push_str(&past.join("; "));
        out.push('.');
    }
    if !recent.is_empty() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str("More recently, ");
        out.push_str(&recent.join("; "));
        out.push('.');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filler(n: usize) -> Vec<ConversationTurn> {
        (0..n)
            .map(|i| ConversationTurn::user(format!("turn {i}")))
            .collect()
    }

    #[test]
    fn short_history_is_not_summarized() {
        let mut turns = filler(10);
        turns[0].text = "i love you".into();
        assert_eq!(summarize(&turns), "");
    }

    #[test]
    fn early_hit_is_phrased_as_past() {
        let mut turns = filler(20);
        turns[2].text = "my name is Anna and I'm from Prague".into();
        let summary = summarize(&turns);
        assert!(summary.starts_with("Earlier in the story,"));
        assert!(summary.contains("personal facts"));
    }

    #[test]
    fn late_hit_is_phrased_as_recent() {
        let mut turns = filler(20);
        turns[18].text = "i love you, be mine".into();
        let summary = summarize(&turns);
        assert!(summary.contains("More recently,"));
        assert!(summary.contains("milestone"));
    }

    #[test]
    fn recent_hit_wins_over_past_hit_in_same_category() {
        let mut turns = filler(25);
        turns[1].text = "that's a secret".into();
        turns[23].text = "promise me you'll stay".into();
        let summary = summarize(&turns);
        assert!(summary.contains("More recently, secrets or promises were exchanged."));
        assert!(!summary.contains("Earlier"));
    }

    #[test]
    fn quiet_history_summarizes_to_nothing() {
        assert_eq!(summarize(&filler(30)), "");
    }
}
