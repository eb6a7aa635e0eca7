//! The seam between the HTTP layer and the inference stack.

use crate::Verdict;

/// Text-to-verdict classification.
///
/// Implementations hold their models read-only after load, so a shared
/// reference is safe to call from concurrent requests.
pub trait Classify: Send + Sync {
    fn classify(&self, text: &str) -> anyhow::Result<Verdict>;
}
