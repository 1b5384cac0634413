//! OpenAI-compatible HTTP client.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::debug;

use crate::error::{AiError, AiResult};
use crate::service::{SpeechToText, TextCompletion};
use crate::types::{ChatMessage, ChatRequest, ChatResponse, TranscriptionResponse};

/// Configuration for the OpenAI client.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Bearer token
    pub api_key: String,
    /// Model used for chat completions
    pub chat_model: String,
    /// Model used for audio transcription
    pub transcription_model: String,
    /// HTTP request timeout
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            chat_model: "gpt-3.5-turbo".to_string(),
            transcription_model: "whisper-1".to_string(),
            timeout: Duration::from_secs(600),
        }
    }
}

impl OpenAiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            chat_model: std::env::var("OPENAI_CHAT_MODEL").unwrap_or(defaults.chat_model),
            transcription_model: std::env::var("OPENAI_TRANSCRIPTION_MODEL")
                .unwrap_or(defaults.transcription_model),
            timeout: std::env::var("OPENAI_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Client for OpenAI-compatible transcription and chat endpoints.
pub struct OpenAiClient {
    http: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a new client. Fails if no API key is configured.
    pub fn new(config: OpenAiConfig) -> AiResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AiError::config("OpenAI API key not set"));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AiError::Network)?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn check_status(response: Response) -> AiResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(AiError::RequestFailed { status, body })
    }
}

#[async_trait]
impl SpeechToText for OpenAiClient {
    async fn transcribe(&self, audio: &Path) -> AiResult<String> {
        let url = self.endpoint("audio/transcriptions");
        let bytes = tokio::fs::read(audio).await?;
        let file_name = audio
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.mp3".to_string());

        debug!(file = %file_name, size = bytes.len(), "Sending transcription request to {}", url);

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/mpeg")?;
        let form = Form::new()
            .text("model", self.config.transcription_model.clone())
            .part("file", part);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let parsed: TranscriptionResponse = response.json().await?;
        Ok(parsed.text)
    }
}

#[async_trait]
impl TextCompletion for OpenAiClient {
    async fn complete(&self, prompt: &str) -> AiResult<String> {
        let url = self.endpoint("chat/completions");
        let request = ChatRequest {
            model: self.config.chat_model.clone(),
            messages: vec![ChatMessage::user(prompt)],
        };

        debug!(model = %request.model, prompt_chars = prompt.chars().count(), "Sending chat completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let parsed: ChatResponse = response.json().await?;
        parsed
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| AiError::invalid_response("No content in chat completion response"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenAiClient {
        let config = OpenAiConfig::default()
            .with_api_key("test-key")
            .with_base_url(server.uri());
        OpenAiClient::new(config).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = OpenAiConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.chat_model, "gpt-3.5-turbo");
        assert_eq!(config.transcription_model, "whisper-1");
    }

    #[test]
    fn test_new_requires_api_key() {
        let err = OpenAiClient::new(OpenAiConfig::default()).err().unwrap();
        assert!(matches!(err, AiError::Config(_)));
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "gpt-3.5-turbo",
                "messages": [{ "role": "user", "content": "Summarize:\n\nhello" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "hi" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server).complete("Summarize:\n\nhello").await.unwrap();
        assert_eq!(text, "hi");
    }

    #[tokio::test]
    async fn test_complete_without_choices_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let err = client_for(&server).complete("x").await.unwrap_err();
        assert!(matches!(err, AiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_retryable_request_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = client_for(&server).complete("x").await.unwrap_err();
        match &err {
            AiError::RequestFailed { status, body } => {
                assert_eq!(*status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_transcribe_uploads_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "text": "hello world" })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("clip.split.000.mp3");
        tokio::fs::write(&audio, b"fake mp3 bytes").await.unwrap();

        let text = client_for(&server).transcribe(&audio).await.unwrap();
        assert_eq!(text, "hello world");
    }

    #[tokio::test]
    async fn test_transcribe_missing_file_is_io_error() {
        let server = MockServer::start().await;
        let err = client_for(&server)
            .transcribe(Path::new("/nonexistent/audio.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Io(_)));
    }
}
