//! Pipeline orchestration: transcribe, reduce, title, assemble.

use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;
use vsum_ai::{frame_prompt, AiError, SpeechToText, TextCompletion};
use vsum_models::{AudioSegment, GeneratedDocument, RunId};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::RunLogger;
use crate::metrics::{record_external_call, record_title_fallback};
use crate::reducer::IterativeReducer;
use crate::retry::CallPolicy;
use crate::summarizer::ConcurrentSummarizer;
use crate::transcription::TranscriptionRunner;

/// Runs the whole transcription-to-title pipeline for one set of segments.
pub struct PipelineDriver {
    config: PipelineConfig,
    transcriber: TranscriptionRunner,
    reducer: IterativeReducer,
    completion: Arc<dyn TextCompletion>,
    policy: CallPolicy,
}

impl PipelineDriver {
    /// Build a driver over the given services. Fails on invalid config.
    pub fn new(
        config: PipelineConfig,
        speech: Arc<dyn SpeechToText>,
        completion: Arc<dyn TextCompletion>,
    ) -> PipelineResult<Self> {
        config.validate()?;

        let policy = config.call_policy();
        let transcriber =
            TranscriptionRunner::new(speech, policy.clone(), config.max_concurrency);
        let summarizer = ConcurrentSummarizer::new(
            completion.clone(),
            policy.clone(),
            config.max_concurrency,
        );
        let reducer = IterativeReducer::new(summarizer, config.max_depth);

        Ok(Self {
            config,
            transcriber,
            reducer,
            completion,
            policy,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run with the configured chunk limit and instructions.
    pub async fn run(&self, segments: &[AudioSegment]) -> PipelineResult<GeneratedDocument> {
        self.run_with(
            segments,
            self.config.chunk_limit,
            &self.config.summary_instruction,
            &self.config.title_instruction,
        )
        .await
    }

    /// Run the pipeline and return the assembled document.
    ///
    /// Every stage failure is fatal except title generation, which falls back
    /// to the configured placeholder.
    pub async fn run_with(
        &self,
        segments: &[AudioSegment],
        chunk_limit: usize,
        summary_instruction: &str,
        title_instruction: &str,
    ) -> PipelineResult<GeneratedDocument> {
        let run_id = RunId::new();
        let logger = RunLogger::new(&run_id, "pipeline");
        let span = logger.create_span();

        async {
            logger.log_start(&format!("{} segments, chunk limit {}", segments.len(), chunk_limit));

            let transcription_log = logger.for_stage("transcription");
            let transcript = self
                .transcriber
                .transcribe_all(segments)
                .await
                .inspect_err(|e| transcription_log.log_error(&e.to_string()))?;
            let transcript_text = transcript.text();
            transcription_log.log_completion(&format!(
                "{} chars from {} segments",
                transcript_text.chars().count(),
                transcript.segments().len()
            ));

            let reduction_log = logger.for_stage("reduction");
            let outcome = self
                .reducer
                .reduce(&transcript_text, summary_instruction, chunk_limit)
                .await
                .inspect_err(|e| reduction_log.log_error(&e.to_string()))?;
            reduction_log.log_completion(&format!(
                "{} iterations, final summary {} chars",
                outcome.iterations.len(),
                outcome.summary.chars().count()
            ));

            let title_log = logger.for_stage("title");
            let title = match self.generate_title(&outcome.summary, title_instruction).await {
                Ok(title) => title,
                Err(e) => {
                    title_log.log_warning(&format!(
                        "{}; using placeholder \"{}\"",
                        e, self.config.title_fallback
                    ));
                    record_title_fallback();
                    self.config.title_fallback.clone()
                }
            };

            let document = GeneratedDocument::assemble(
                run_id.clone(),
                transcript.into_segments(),
                outcome.iterations,
                title,
                self.config.title_placement,
            );
            logger.log_completion(&format!("{} artifacts", document.len()));

            Ok(document)
        }
        .instrument(span)
        .await
    }

    async fn generate_title(&self, summary: &str, instruction: &str) -> PipelineResult<String> {
        let prompt = frame_prompt(instruction, summary);

        let started = Instant::now();
        let result = self
            .policy
            .call("title", || self.completion.complete(&prompt))
            .await;
        record_external_call("title", result.is_ok(), started.elapsed().as_secs_f64());

        let title = result.map_err(|source| PipelineError::Completion {
            chunk: None,
            source,
        })?;
        let title = title.trim();
        if title.is_empty() {
            return Err(PipelineError::Completion {
                chunk: None,
                source: AiError::invalid_response("empty title"),
            });
        }
        Ok(title.to_string())
    }
}
