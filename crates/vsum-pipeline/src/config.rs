//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

use vsum_media::DEFAULT_SEGMENT_SECS;
use vsum_models::TitlePlacement;

use crate::error::{PipelineError, PipelineResult};
use crate::retry::{CallPolicy, RetryConfig};

pub const DEFAULT_SUMMARY_INSTRUCTION: &str = "Please summarize the following sentences in Japanese, separating them into paragraphs and line breaks. Adjust the text to be natural. Please sort out redundant wording.:";

pub const DEFAULT_TITLE_INSTRUCTION: &str =
    "Please create a heading for the following text in Japanese:";

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum characters per chunk, and the size the summary must converge under
    pub chunk_limit: usize,
    /// Maximum reduction passes before giving up
    pub max_depth: usize,
    /// Maximum external calls in flight per fan-out
    pub max_concurrency: usize,
    /// Timeout for one external call attempt
    pub call_timeout: Duration,
    /// Retry policy for external calls
    pub retry: RetryConfig,
    /// Length of one audio segment in seconds
    pub segment_duration_secs: u64,
    /// Upper bound on one ffmpeg run
    pub media_timeout: Duration,
    /// Scratch directory, reset at the start of every run
    pub work_dir: PathBuf,
    /// Where the generated document is written
    pub output_dir: PathBuf,
    /// Position of the title artifact in the document
    pub title_placement: TitlePlacement,
    /// Title used when title generation fails
    pub title_fallback: String,
    pub summary_instruction: String,
    pub title_instruction: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_limit: 2000,
            max_depth: 10,
            max_concurrency: 8,
            call_timeout: Duration::from_secs(300),
            retry: RetryConfig::default(),
            segment_duration_secs: DEFAULT_SEGMENT_SECS,
            media_timeout: Duration::from_secs(3600),
            work_dir: PathBuf::from("tmp"),
            output_dir: PathBuf::from("summary"),
            title_placement: TitlePlacement::Last,
            title_fallback: "Untitled".to_string(),
            summary_instruction: DEFAULT_SUMMARY_INSTRUCTION.to_string(),
            title_instruction: DEFAULT_TITLE_INSTRUCTION.to_string(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl PipelineConfig {
    /// Create config from `VSUM_*` environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            chunk_limit: env_parse("VSUM_CHUNK_LIMIT").unwrap_or(defaults.chunk_limit),
            max_depth: env_parse("VSUM_MAX_DEPTH").unwrap_or(defaults.max_depth),
            max_concurrency: env_parse("VSUM_MAX_CONCURRENCY").unwrap_or(defaults.max_concurrency),
            call_timeout: env_parse("VSUM_CALL_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.call_timeout),
            retry: RetryConfig {
                max_retries: env_parse("VSUM_MAX_RETRIES").unwrap_or(defaults.retry.max_retries),
                ..defaults.retry
            },
            segment_duration_secs: env_parse("VSUM_SEGMENT_SECS")
                .unwrap_or(defaults.segment_duration_secs),
            media_timeout: env_parse("VSUM_MEDIA_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.media_timeout),
            work_dir: std::env::var("VSUM_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            output_dir: std::env::var("VSUM_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            title_placement: env_parse("VSUM_TITLE_PLACEMENT").unwrap_or(defaults.title_placement),
            title_fallback: std::env::var("VSUM_TITLE_FALLBACK").unwrap_or(defaults.title_fallback),
            summary_instruction: std::env::var("VSUM_SUMMARY_INSTRUCTION")
                .unwrap_or(defaults.summary_instruction),
            title_instruction: std::env::var("VSUM_TITLE_INSTRUCTION")
                .unwrap_or(defaults.title_instruction),
        }
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.chunk_limit == 0 {
            return Err(PipelineError::invalid_input("chunk limit must be positive"));
        }
        if self.max_depth == 0 {
            return Err(PipelineError::invalid_input("max depth must be positive"));
        }
        if self.segment_duration_secs == 0 {
            return Err(PipelineError::invalid_input("segment duration must be positive"));
        }
        Ok(())
    }

    pub fn call_policy(&self) -> CallPolicy {
        CallPolicy::new(self.call_timeout, self.retry.clone())
    }
}
