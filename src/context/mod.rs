//! Context window management.
//!
//! Conversation history grows without bound; the prompt cannot. This
//! module compresses history into a bounded window in two independent
//! passes: [`select`] keeps the most recent turns verbatim and fills the
//! rest of the budget with the highest-scoring earlier turns, while the
//! summary pass distils the *entire* history into a few prose sentences.
//!
//! Both heuristics are data-driven tables, so each category is
//! unit-testable on its own.

mod select;
mod summary;

pub use select::{ContextWindow, select};
pub use summary::{SUMMARY_MIN_TURNS, summarize};
