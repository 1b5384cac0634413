//! Document sinks.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};
use vsum_models::GeneratedDocument;

use crate::error::PipelineResult;

/// Persists a finished document, artifact by artifact, in document order.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn persist(&self, document: &GeneratedDocument) -> PipelineResult<()>;
}

/// Writes each run to `<dir>/<run_id>/` as one `NN_<label>.txt` per artifact
/// plus the whole document as `document.json`.
///
/// The run directory is recreated on every write, so it only ever holds the
/// artifacts of one document.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the given document is written to.
    pub fn run_dir(&self, document: &GeneratedDocument) -> PathBuf {
        self.dir.join(document.run_id.as_str())
    }
}

/// `NN_<label>.txt`, padded so names sort in document order.
fn artifact_file_name(position: usize, count: usize, label: &str) -> String {
    let width = count.saturating_sub(1).to_string().len().max(2);
    format!("{:0width$}_{}.txt", position, label, width = width)
}

#[async_trait]
impl DocumentSink for FileSink {
    async fn persist(&self, document: &GeneratedDocument) -> PipelineResult<()> {
        let run_dir = self.run_dir(document);
        if fs::try_exists(&run_dir).await? {
            fs::remove_dir_all(&run_dir).await?;
        }
        fs::create_dir_all(&run_dir).await?;

        let count = document.len();
        for (position, artifact) in document.artifacts().iter().enumerate() {
            let path = run_dir.join(artifact_file_name(position, count, &artifact.label()));
            fs::write(&path, &artifact.text).await?;
            debug!(path = %path.display(), "Wrote artifact");
        }

        let json = serde_json::to_string_pretty(document)?;
        fs::write(run_dir.join("document.json"), json).await?;

        info!(dir = %run_dir.display(), artifacts = count, "Document written");
        Ok(())
    }
}

/// Echoes every artifact to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl DocumentSink for LogSink {
    async fn persist(&self, document: &GeneratedDocument) -> PipelineResult<()> {
        for artifact in document.artifacts() {
            info!(
                run_id = %document.run_id,
                artifact = %artifact.label(),
                "{}:\n{}",
                artifact.kind,
                artifact.text
            );
        }
        Ok(())
    }
}
