//! Concurrent transcription of audio segments.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};
use vsum_ai::SpeechToText;
use vsum_models::AudioSegment;

use crate::error::{PipelineError, PipelineResult};
use crate::fanout::concurrent_map;
use crate::metrics::record_external_call;
use crate::retry::CallPolicy;

/// Transcript of a whole video, kept per segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    segments: Vec<String>,
}

impl Transcript {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Per-segment texts in segment order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The segment texts concatenated in segment order.
    pub fn text(&self) -> String {
        self.segments.concat()
    }

    pub fn into_segments(self) -> Vec<String> {
        self.segments
    }
}

/// Fans one speech-to-text call out per segment and reassembles the results.
#[derive(Clone)]
pub struct TranscriptionRunner {
    service: Arc<dyn SpeechToText>,
    policy: CallPolicy,
    max_concurrency: usize,
}

impl TranscriptionRunner {
    pub fn new(service: Arc<dyn SpeechToText>, policy: CallPolicy, max_concurrency: usize) -> Self {
        Self {
            service,
            policy,
            max_concurrency,
        }
    }

    /// Transcribe every segment concurrently.
    ///
    /// Segments must carry contiguous 0-based indices in slice order. The
    /// first failing segment aborts the batch; nothing partial is returned.
    pub async fn transcribe_all(&self, segments: &[AudioSegment]) -> PipelineResult<Transcript> {
        if segments.is_empty() {
            return Err(PipelineError::invalid_input("no audio segments to transcribe"));
        }
        if let Some((position, segment)) = segments
            .iter()
            .enumerate()
            .find(|(position, segment)| segment.index != *position)
        {
            return Err(PipelineError::invalid_input(format!(
                "segment at position {} has index {}; indices must be contiguous from 0",
                position, segment.index
            )));
        }

        info!(segments = segments.len(), "Transcribing audio segments");

        let texts = concurrent_map(segments, self.max_concurrency, |_, segment| {
            self.transcribe_segment(segment)
        })
        .await?;

        Ok(Transcript::new(texts))
    }

    async fn transcribe_segment(&self, segment: &AudioSegment) -> PipelineResult<String> {
        let started = Instant::now();
        let result = self
            .policy
            .call("transcribe", || self.service.transcribe(segment.path()))
            .await;
        record_external_call("transcribe", result.is_ok(), started.elapsed().as_secs_f64());

        let text = result.map_err(|source| PipelineError::Transcription {
            segment: segment.index,
            source,
        })?;

        debug!(
            segment = segment.index,
            chars = text.chars().count(),
            "Transcript {}:\n{}",
            segment.index,
            text
        );
        Ok(text)
    }
}
