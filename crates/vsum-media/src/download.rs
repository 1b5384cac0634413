//! Remote video acquisition through yt-dlp.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use tokio::process::Command;
use tracing::info;

use crate::command::require_tool;
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::hashed_stem;

/// Smallest progressive mp4 that still carries an audio track. Only the audio
/// is used downstream, so resolution is irrelevant.
const FORMAT_SELECTOR: &str =
    "worst[ext=mp4][vcodec!=none][acodec!=none]/worst[ext=mp4][acodec!=none]/worst";

async fn yt_dlp(args: &[&str]) -> MediaResult<Output> {
    let program = require_tool("yt-dlp")?;
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::process_failed("yt-dlp", &output));
    }
    Ok(output)
}

/// Resolve the title of a remote video without downloading it.
pub async fn fetch_video_title(url: &str) -> MediaResult<String> {
    let output = yt_dlp(&["--print", "title", "--no-download", "--no-playlist", url]).await?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    match stdout.lines().next().map(str::trim) {
        Some(title) if !title.is_empty() => Ok(title.to_string()),
        _ => Err(MediaError::download_failed(format!("no title reported for {}", url))),
    }
}

/// Download a remote video into `dir` as `{sha256(title)}.mp4`.
pub async fn download_video(url: &str, dir: impl AsRef<Path>) -> MediaResult<PathBuf> {
    let title = fetch_video_title(url).await?;
    let target = dir.as_ref().join(format!("{}.mp4", hashed_stem(&title)));
    let target_str = target.to_string_lossy().into_owned();

    info!(url, title = %title, target = %target.display(), "Downloading video");
    yt_dlp(&["--no-playlist", "-f", FORMAT_SELECTOR, "-o", &target_str, url]).await?;

    let size = match tokio::fs::metadata(&target).await {
        Ok(meta) => meta.len(),
        Err(_) => {
            return Err(MediaError::download_failed(format!(
                "yt-dlp reported success but {} is missing",
                target.display()
            )))
        }
    };
    info!(target = %target.display(), bytes = size, "Video downloaded");

    Ok(target)
}
