//! Concurrent per-chunk summarization.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;
use vsum_ai::{frame_prompt, TextCompletion};
use vsum_models::TextChunk;

use crate::error::{PipelineError, PipelineResult};
use crate::fanout::concurrent_map;
use crate::metrics::record_external_call;
use crate::retry::CallPolicy;

/// Fans one completion call out per chunk and concatenates the answers in
/// chunk order.
#[derive(Clone)]
pub struct ConcurrentSummarizer {
    service: Arc<dyn TextCompletion>,
    policy: CallPolicy,
    max_concurrency: usize,
}

impl ConcurrentSummarizer {
    pub fn new(
        service: Arc<dyn TextCompletion>,
        policy: CallPolicy,
        max_concurrency: usize,
    ) -> Self {
        Self {
            service,
            policy,
            max_concurrency,
        }
    }

    /// Summarize every chunk with `instruction`.
    ///
    /// Any failed call fails the whole operation, so a summary never silently
    /// omits a chunk.
    pub async fn summarize_all(
        &self,
        chunks: &[TextChunk],
        instruction: &str,
    ) -> PipelineResult<String> {
        let summaries = concurrent_map(chunks, self.max_concurrency, |_, chunk| {
            self.summarize_chunk(chunk, instruction)
        })
        .await?;

        Ok(summaries.concat())
    }

    async fn summarize_chunk(&self, chunk: &TextChunk, instruction: &str) -> PipelineResult<String> {
        let prompt = frame_prompt(instruction, &chunk.content);

        let started = Instant::now();
        let result = self
            .policy
            .call("summarize", || self.service.complete(&prompt))
            .await;
        record_external_call("summarize", result.is_ok(), started.elapsed().as_secs_f64());

        let summary = result.map_err(|source| PipelineError::Completion {
            chunk: Some(chunk.index),
            source,
        })?;

        debug!(
            chunk = chunk.index,
            input_chars = chunk.char_len(),
            output_chars = summary.chars().count(),
            "Chunk summarized"
        );
        Ok(summary)
    }
}
