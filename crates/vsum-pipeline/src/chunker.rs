//! Character-count text chunking.

use std::num::NonZeroUsize;

use vsum_models::TextChunk;

/// Split `text` into successive chunks of exactly `limit` characters; the
/// remainder (`1..=limit` characters) becomes the last chunk.
///
/// Boundaries fall on `char` boundaries with no awareness of words or
/// sentences, so concatenating the chunks in order reproduces `text`. The
/// empty string yields a single empty chunk.
pub fn chunk_text(text: &str, limit: NonZeroUsize) -> Vec<TextChunk> {
    let limit = limit.get();
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (byte_idx, _) in text.char_indices() {
        if count == limit {
            chunks.push(TextChunk::new(chunks.len(), &text[start..byte_idx]));
            start = byte_idx;
            count = 0;
        }
        count += 1;
    }
    chunks.push(TextChunk::new(chunks.len(), &text[start..]));

    chunks
}
