//! Service traits consumed by the pipeline.

use std::path::Path;

use async_trait::async_trait;

use crate::error::AiResult;

/// Speech-to-text: one call per audio file.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: &Path) -> AiResult<String>;
}

/// Single-call text-to-text completion.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, prompt: &str) -> AiResult<String>;
}

/// Frame `text` with an instruction the way every summary and title request
/// is sent: instruction, blank line, text.
pub fn frame_prompt(instruction: &str, text: &str) -> String {
    format!("{}\n\n{}", instruction, text)
}
