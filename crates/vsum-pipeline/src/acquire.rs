//! Turns a video source into ordered audio segments.

use std::path::Path;

use tracing::info;
use vsum_media::{
    download_video, extract_audio, hashed_stem, prepare_work_dir, split_audio, FfmpegRunner,
};
use vsum_models::{validate_youtube_url, AudioSegment, VideoSource};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};

/// Acquire the video, extract its audio and cut it into fixed-length segments.
///
/// The source is validated before the work directory is reset, so a bad URL or
/// a missing file leaves the previous work directory untouched.
pub async fn prepare_segments(
    config: &PipelineConfig,
    source: &VideoSource,
) -> PipelineResult<Vec<AudioSegment>> {
    validate_source(source).await?;
    prepare_work_dir(&config.work_dir).await?;

    let video = match source {
        VideoSource::Remote(url) => download_video(url, &config.work_dir).await?,
        VideoSource::Local(path) => path.clone(),
    };
    let stem = work_stem(source, &video);

    let runner = FfmpegRunner::new().with_timeout(config.media_timeout);
    let audio = extract_audio(&runner, &video, &config.work_dir, &stem).await?;
    let segments = split_audio(
        &runner,
        &audio,
        config.segment_duration_secs,
        &config.work_dir,
        &stem,
    )
    .await?;

    info!(source = %source, segments = segments.len(), "Audio segments ready");
    Ok(segments)
}

async fn validate_source(source: &VideoSource) -> PipelineResult<()> {
    match source {
        VideoSource::Remote(url) => {
            let video_id = validate_youtube_url(url)
                .map_err(|e| PipelineError::invalid_input(e.to_string()))?;
            info!(video_id = %video_id, "Accepted remote video URL");
        }
        VideoSource::Local(path) => {
            if !tokio::fs::try_exists(path).await? {
                return Err(PipelineError::invalid_input(format!(
                    "video file not found: {}",
                    path.display()
                )));
            }
        }
    }
    Ok(())
}

/// Downloaded files are already named by title hash; local files are named
/// by the hash of their path.
fn work_stem(source: &VideoSource, video: &Path) -> String {
    match source {
        VideoSource::Remote(_) => video
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| hashed_stem(&video.to_string_lossy())),
        VideoSource::Local(path) => hashed_stem(&path.to_string_lossy()),
    }
}
