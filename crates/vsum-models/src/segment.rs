//! Audio segment model.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One time-bounded slice of the source audio.
///
/// Segments are produced by the segmenter with contiguous 0-based indices
/// and are read-only from then on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSegment {
    /// Position of the segment in the source audio
    pub index: usize,
    /// Location of the segment's audio data
    pub path: PathBuf,
}

impl AudioSegment {
    pub fn new(index: usize, path: impl Into<PathBuf>) -> Self {
        Self {
            index,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build segments from an already ordered list of files.
    pub fn from_ordered_paths<I, P>(paths: I) -> Vec<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths
            .into_iter()
            .enumerate()
            .map(|(index, path)| Self::new(index, path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ordered_paths_assigns_contiguous_indices() {
        let segments = AudioSegment::from_ordered_paths(["a.mp3", "b.mp3", "c.mp3"]);

        let indices: Vec<usize> = segments.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(segments[2].path(), Path::new("c.mp3"));
    }
}
