//! Audio extraction and segmentation.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;
use vsum_models::AudioSegment;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Default duration of one audio segment (20 minutes).
pub const DEFAULT_SEGMENT_SECS: u64 = 1200;

/// Extract the audio track of `video` into `{dir}/{stem}.mp3`.
pub async fn extract_audio(
    runner: &FfmpegRunner,
    video: impl AsRef<Path>,
    dir: impl AsRef<Path>,
    stem: &str,
) -> MediaResult<PathBuf> {
    let video = video.as_ref();
    if !fs::try_exists(video).await? {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }

    let output = dir.as_ref().join(format!("{}.mp3", stem));
    info!(video = %video.display(), audio = %output.display(), "Extracting audio");

    let cmd = FfmpegCommand::new(video, &output)
        .no_video()
        .audio_codec("libmp3lame");
    runner.run(&cmd).await?;

    Ok(output)
}

/// Cut `audio` into `segment_secs`-long files named `{stem}.split.NNN.mp3`.
///
/// Returns the produced files as contiguous, 0-based [`AudioSegment`]s in
/// playback order.
pub async fn split_audio(
    runner: &FfmpegRunner,
    audio: impl AsRef<Path>,
    segment_secs: u64,
    dir: impl AsRef<Path>,
    stem: &str,
) -> MediaResult<Vec<AudioSegment>> {
    let audio = audio.as_ref();
    let dir = dir.as_ref();

    let prefix = format!("{}.split.", stem);
    remove_split_files(dir, &prefix).await?;

    let pattern = dir.join(format!("{}%03d.mp3", prefix));
    info!(audio = %audio.display(), segment_secs, "Splitting audio into segments");

    let cmd = FfmpegCommand::new(audio, &pattern)
        .stream_copy()
        .segment(segment_secs);
    runner.run(&cmd).await?;

    let files = list_split_files(dir, &prefix).await?;
    if files.is_empty() {
        return Err(MediaError::NoSegments(audio.to_path_buf()));
    }

    info!(count = files.len(), "Audio split complete");
    Ok(AudioSegment::from_ordered_paths(files))
}

/// List `{prefix}*.mp3` files in `dir`, sorted by name.
async fn list_split_files(dir: &Path, prefix: &str) -> MediaResult<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(prefix) && name.ends_with(".mp3") {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

async fn remove_split_files(dir: &Path, prefix: &str) -> MediaResult<()> {
    for file in list_split_files(dir, prefix).await? {
        fs::remove_file(&file).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_split_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["x.split.002.mp3", "x.split.000.mp3", "x.split.001.mp3", "x.mp3", "y.split.000.mp3"] {
            fs::write(dir.path().join(name), b"").await.unwrap();
        }

        let files = list_split_files(dir.path(), "x.split.").await.unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["x.split.000.mp3", "x.split.001.mp3", "x.split.002.mp3"]);
    }

    #[tokio::test]
    async fn test_extract_audio_missing_video() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.mp4");

        let err = extract_audio(&FfmpegRunner::new(), &missing, dir.path(), "stem")
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::FileNotFound(p) if p == missing));
    }
}
