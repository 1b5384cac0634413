//! Media error types.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use thiserror::Error;

pub type MediaResult<T> = Result<T, MediaError>;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{0} is not installed or not on PATH")]
    ToolMissing(&'static str),

    #[error("{tool} failed ({status}): {stderr}")]
    ProcessFailed {
        tool: &'static str,
        status: String,
        /// Last line ffmpeg/yt-dlp wrote to stderr
        stderr: String,
    },

    #[error("{tool} did not finish within {timeout:?}")]
    Timeout {
        tool: &'static str,
        timeout: Duration,
    },

    #[error("Video download failed: {0}")]
    DownloadFailed(String),

    #[error("Input file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Splitting {} produced no segments", .0.display())]
    NoSegments(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Failure of an external tool, keeping the last stderr line.
    pub fn process_failed(tool: &'static str, output: &Output) -> Self {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let last_line = stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("no output");

        Self::ProcessFailed {
            tool,
            status: output.status.to_string(),
            stderr: last_line.to_string(),
        }
    }

    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::DownloadFailed(message.into())
    }
}
