//! FFmpeg and yt-dlp wrappers for the summary pipeline.
//!
//! This crate provides:
//! - Work directory preparation and content-hashed file naming
//! - Remote video download via yt-dlp
//! - Audio extraction and fixed-duration segmentation via FFmpeg

pub mod audio;
pub mod command;
pub mod download;
pub mod error;
pub mod fs_utils;

pub use audio::{extract_audio, split_audio, DEFAULT_SEGMENT_SECS};
pub use command::{require_tool, FfmpegCommand, FfmpegRunner};
pub use download::{download_video, fetch_video_title};
pub use error::{MediaError, MediaResult};
pub use fs_utils::{hashed_stem, prepare_work_dir};
