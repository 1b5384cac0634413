//! Video source model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where the video to summarize comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum VideoSource {
    /// A video file already on disk
    Local(PathBuf),
    /// A remote video page URL (fetched with yt-dlp)
    Remote(String),
}

impl fmt::Display for VideoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoSource::Local(path) => write!(f, "{}", path.display()),
            VideoSource::Remote(url) => write!(f, "{}", url),
        }
    }
}
