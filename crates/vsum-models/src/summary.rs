//! Summary iteration model.

use serde::{Deserialize, Serialize};

/// Output of one reduction pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryIteration {
    /// Reduction depth, starting at 0
    pub depth: usize,
    /// Concatenated chunk summaries produced at this depth
    pub summary: String,
}

impl SummaryIteration {
    pub fn new(depth: usize, summary: impl Into<String>) -> Self {
        Self {
            depth,
            summary: summary.into(),
        }
    }

    /// Length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.summary.chars().count()
    }
}
