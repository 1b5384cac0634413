//! Pipeline error types.

use thiserror::Error;
use vsum_ai::AiError;
use vsum_media::MediaError;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transcription of segment {segment} failed: {source}")]
    Transcription {
        segment: usize,
        #[source]
        source: AiError,
    },

    #[error("Completion for {} failed: {source}", completion_target(.chunk))]
    Completion {
        /// `None` for the title request
        chunk: Option<usize>,
        #[source]
        source: AiError,
    },

    #[error("Reduction did not converge after {iterations} iterations (last summary {last_len} chars, limit {limit})")]
    ReductionDidNotConverge {
        iterations: usize,
        last_len: usize,
        limit: usize,
    },

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn completion_target(chunk: &Option<usize>) -> String {
    match chunk {
        Some(index) => format!("chunk {}", index),
        None => "title".to_string(),
    }
}

impl PipelineError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Name of the stage the error came from, for run reports.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::InvalidInput(_) => "input",
            PipelineError::Transcription { .. } => "transcription",
            PipelineError::Completion { chunk: Some(_), .. } => "summarization",
            PipelineError::Completion { chunk: None, .. } => "title",
            PipelineError::ReductionDidNotConverge { .. } => "reduction",
            PipelineError::Media(_) => "media",
            PipelineError::Io(_) | PipelineError::Serialization(_) => "output",
        }
    }

    /// Index of the failing segment or chunk, when there is one.
    pub fn failing_index(&self) -> Option<usize> {
        match self {
            PipelineError::Transcription { segment, .. } => Some(*segment),
            PipelineError::Completion { chunk, .. } => *chunk,
            _ => None,
        }
    }
}
