//! Video transcription and summarization pipeline.
//!
//! This crate provides:
//! - Character-count chunking and a bounded, order-preserving concurrent map
//! - Concurrent transcription and per-chunk summarization
//! - Iterative reduction until the summary fits a size limit
//! - The pipeline driver, document sinks, and video acquisition

pub mod acquire;
pub mod chunker;
pub mod config;
pub mod driver;
pub mod error;
pub mod fanout;
pub mod logging;
pub mod metrics;
pub mod reducer;
pub mod retry;
pub mod sink;
pub mod summarizer;
pub mod transcription;

#[cfg(test)]
mod test_support;

pub use acquire::prepare_segments;
pub use chunker::chunk_text;
pub use config::PipelineConfig;
pub use driver::PipelineDriver;
pub use error::{PipelineError, PipelineResult};
pub use fanout::concurrent_map;
pub use logging::{init_tracing, RunLogger};
pub use reducer::{IterativeReducer, ReductionOutcome};
pub use retry::{CallPolicy, RetryConfig};
pub use sink::{DocumentSink, FileSink, LogSink};
pub use summarizer::ConcurrentSummarizer;
pub use transcription::{Transcript, TranscriptionRunner};
