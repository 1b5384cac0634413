//! Text chunk model.

use serde::{Deserialize, Serialize};

/// A bounded-size contiguous slice of a larger text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Position of the chunk within its chunking pass
    pub index: usize,
    /// Chunk text
    pub content: String,
}

impl TextChunk {
    pub fn new(index: usize, content: impl Into<String>) -> Self {
        Self {
            index,
            content: content.into(),
        }
    }

    /// Length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}
