//! Generated document models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::summary::SummaryIteration;

/// Unique identifier for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new random run ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the title artifact goes in the assembled document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TitlePlacement {
    /// Title before the transcript artifacts
    First,
    /// Title after the last summary iteration
    #[default]
    Last,
}

impl TitlePlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitlePlacement::First => "first",
            TitlePlacement::Last => "last",
        }
    }
}

impl fmt::Display for TitlePlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TitlePlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(TitlePlacement::First),
            "last" => Ok(TitlePlacement::Last),
            other => Err(format!("unknown title placement: {}", other)),
        }
    }
}

/// What an artifact is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Transcription of one audio segment
    Transcript { segment: usize },
    /// One reduction pass
    Summary { depth: usize },
    /// Generated heading for the final summary
    Title,
}

impl ArtifactKind {
    /// Stable label, usable as a file stem.
    pub fn label(&self) -> String {
        match self {
            ArtifactKind::Transcript { segment } => format!("transcript_{:03}", segment),
            ArtifactKind::Summary { depth } => format!("summary_{}", depth),
            ArtifactKind::Title => "title".to_string(),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Transcript { segment } => write!(f, "Transcript {}", segment),
            ArtifactKind::Summary { depth } => write!(f, "Summary {}", depth),
            ArtifactKind::Title => write!(f, "Title"),
        }
    }
}

/// A labeled text product retained for the final document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub text: String,
}

impl Artifact {
    pub fn new(kind: ArtifactKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn label(&self) -> String {
        self.kind.label()
    }
}

/// Ordered artifacts of one pipeline run, emitted once at the end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDocument {
    /// Run that produced the document
    pub run_id: RunId,
    /// Assembly timestamp
    pub created_at: DateTime<Utc>,
    /// Artifacts in output order
    pub artifacts: Vec<Artifact>,
}

impl GeneratedDocument {
    /// Assemble a document from the per-stage outputs.
    ///
    /// Order: segment transcripts, summary iterations by depth, title. With
    /// [`TitlePlacement::First`] the title is moved to the front.
    pub fn assemble(
        run_id: RunId,
        segment_transcripts: Vec<String>,
        mut iterations: Vec<SummaryIteration>,
        title: String,
        placement: TitlePlacement,
    ) -> Self {
        iterations.sort_by_key(|it| it.depth);

        let mut artifacts =
            Vec::with_capacity(segment_transcripts.len() + iterations.len() + 1);
        let title = Artifact::new(ArtifactKind::Title, title);

        if placement == TitlePlacement::First {
            artifacts.push(title.clone());
        }
        artifacts.extend(
            segment_transcripts
                .into_iter()
                .enumerate()
                .map(|(segment, text)| Artifact::new(ArtifactKind::Transcript { segment }, text)),
        );
        artifacts.extend(
            iterations
                .into_iter()
                .map(|it| Artifact::new(ArtifactKind::Summary { depth: it.depth }, it.summary)),
        );
        if placement == TitlePlacement::Last {
            artifacts.push(title);
        }

        Self {
            run_id,
            created_at: Utc::now(),
            artifacts,
        }
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn title(&self) -> Option<&str> {
        self.artifacts
            .iter()
            .find(|a| a.kind == ArtifactKind::Title)
            .map(|a| a.text.as_str())
    }

    /// The deepest summary iteration, i.e. the converged summary.
    pub fn final_summary(&self) -> Option<&str> {
        self.artifacts
            .iter()
            .filter_map(|a| match a.kind {
                ArtifactKind::Summary { depth } => Some((depth, a.text.as_str())),
                _ => None,
            })
            .max_by_key(|(depth, _)| *depth)
            .map(|(_, text)| text)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}
