//! Shared data models for the video summary pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Audio segments handed to transcription
//! - Text chunks and summary iterations produced by reduction
//! - The generated document and its labeled artifacts
//! - Video sources and URL validation

pub mod chunk;
pub mod document;
pub mod segment;
pub mod source;
pub mod summary;
pub mod utils;

// Re-export common types
pub use chunk::TextChunk;
pub use document::{Artifact, ArtifactKind, GeneratedDocument, RunId, TitlePlacement};
pub use segment::AudioSegment;
pub use source::VideoSource;
pub use summary::SummaryIteration;
pub use utils::{validate_youtube_url, UrlError};
