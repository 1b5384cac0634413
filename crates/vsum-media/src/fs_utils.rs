//! Filesystem helpers for the work directory.

use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::debug;

use crate::error::MediaResult;

/// Reset the work directory: remove it if present, then create it empty.
pub async fn prepare_work_dir(path: impl AsRef<Path>) -> MediaResult<()> {
    let path = path.as_ref();

    if fs::try_exists(path).await? {
        debug!("Removing existing work directory {}", path.display());
        fs::remove_dir_all(path).await?;
    }
    fs::create_dir_all(path).await?;

    Ok(())
}

/// Stable file stem derived from arbitrary text (a title or a path).
///
/// Hex-encoded SHA-256, so the stem is always filesystem-safe.
pub fn hashed_stem(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    format!("{:x}", digest)
}
