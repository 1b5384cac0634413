//! Scripted service stubs shared by unit tests.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use vsum_ai::{AiError, AiResult, SpeechToText, TextCompletion};

/// Text after the instruction framing (`"{instruction}\n\n{text}"`).
pub fn body_of(prompt: &str) -> &str {
    prompt.split_once("\n\n").map(|(_, body)| body).unwrap_or(prompt)
}

pub fn failure(msg: &str) -> AiError {
    AiError::RequestFailed {
        status: 500,
        body: msg.to_string(),
    }
}

/// Completion stub driven by a closure returning `(delay, result)`.
pub struct ScriptedCompletion<F> {
    script: F,
    calls: AtomicUsize,
    finished: AtomicUsize,
}

impl<F> ScriptedCompletion<F>
where
    F: Fn(&str) -> (Duration, AiResult<String>) + Send + Sync,
{
    pub fn new(script: F) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        }
    }

    /// Calls started.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Calls that ran to completion (not cancelled mid-delay).
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

/// Completion stub that answers instantly.
pub fn instant_completion(
    reply: impl Fn(&str) -> AiResult<String> + Send + Sync,
) -> ScriptedCompletion<impl Fn(&str) -> (Duration, AiResult<String>) + Send + Sync> {
    ScriptedCompletion::new(move |prompt: &str| (Duration::ZERO, reply(prompt)))
}

#[async_trait]
impl<F> TextCompletion for ScriptedCompletion<F>
where
    F: Fn(&str) -> (Duration, AiResult<String>) + Send + Sync,
{
    async fn complete(&self, prompt: &str) -> AiResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (delay, result) = (self.script)(prompt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.finished.fetch_add(1, Ordering::SeqCst);
        result
    }
}

/// Speech stub driven by a closure over the segment path.
pub struct ScriptedSpeech<F> {
    script: F,
    finished: AtomicUsize,
}

impl<F> ScriptedSpeech<F>
where
    F: Fn(&Path) -> (Duration, AiResult<String>) + Send + Sync,
{
    pub fn new(script: F) -> Self {
        Self {
            script,
            finished: AtomicUsize::new(0),
        }
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<F> SpeechToText for ScriptedSpeech<F>
where
    F: Fn(&Path) -> (Duration, AiResult<String>) + Send + Sync,
{
    async fn transcribe(&self, audio: &Path) -> AiResult<String> {
        let (delay, result) = (self.script)(audio);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.finished.fetch_add(1, Ordering::SeqCst);
        result
    }
}
