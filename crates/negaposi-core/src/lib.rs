//! Shared domain types for the negaposi verdict service.

mod classify;
mod verdict;

pub use classify::Classify;
pub use verdict::{LABEL_NEGATIVE, LABEL_POSITIVE, Verdict, VerdictMap};
