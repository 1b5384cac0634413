//! FFmpeg invocation.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// One ffmpeg run: `ffmpeg -y -v error -i <input> [options] <output>`.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    input: PathBuf,
    output: PathBuf,
    options: Vec<String>,
}

impl FfmpegCommand {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            options: Vec::new(),
        }
    }

    fn with(mut self, options: &[&str]) -> Self {
        self.options.extend(options.iter().map(|o| o.to_string()));
        self
    }

    /// Drop the video stream.
    pub fn no_video(self) -> Self {
        self.with(&["-vn"])
    }

    pub fn audio_codec(self, codec: &str) -> Self {
        self.with(&["-c:a", codec])
    }

    /// Copy streams without re-encoding.
    pub fn stream_copy(self) -> Self {
        self.with(&["-c", "copy"])
    }

    /// Cut the input into `segment_secs`-long files with the segment muxer.
    /// The output path must carry a counter such as `%03d`.
    pub fn segment(self, segment_secs: u64) -> Self {
        let secs = segment_secs.to_string();
        self.with(&[
            "-map",
            "0",
            "-f",
            "segment",
            "-segment_time",
            secs.as_str(),
            "-reset_timestamps",
            "1",
        ])
    }

    pub fn build_args(&self) -> Vec<String> {
        let mut args: Vec<String> = ["-y", "-v", "error", "-i"]
            .into_iter()
            .map(String::from)
            .collect();
        args.push(self.input.to_string_lossy().into_owned());
        args.extend(self.options.iter().cloned());
        args.push(self.output.to_string_lossy().into_owned());
        args
    }
}

/// Runs [`FfmpegCommand`]s, optionally bounded by a timeout.
#[derive(Debug, Clone, Default)]
pub struct FfmpegRunner {
    timeout: Option<Duration>,
}

impl FfmpegRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        let program = require_tool("ffmpeg")?;
        let args = cmd.build_args();
        debug!(args = %args.join(" "), "Running ffmpeg");

        // The child is killed if the wait below is dropped on timeout.
        let child = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;
        let waiting = child.wait_with_output();

        let output = match self.timeout {
            None => waiting.await?,
            Some(limit) => match tokio::time::timeout(limit, waiting).await {
                Ok(output) => output?,
                Err(_) => {
                    warn!(timeout = ?limit, "ffmpeg timed out, killing it");
                    return Err(MediaError::Timeout {
                        tool: "ffmpeg",
                        timeout: limit,
                    });
                }
            },
        };

        if !output.status.success() {
            return Err(MediaError::process_failed("ffmpeg", &output));
        }
        Ok(())
    }
}

/// Locate an external tool on `PATH`.
pub fn require_tool(name: &'static str) -> MediaResult<PathBuf> {
    which::which(name).map_err(|_| MediaError::ToolMissing(name))
}
