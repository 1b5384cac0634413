//! Clients for the external speech-to-text and text-completion services.
//!
//! The pipeline is written against the [`SpeechToText`] and
//! [`TextCompletion`] traits; [`OpenAiClient`] implements both for any
//! OpenAI-compatible endpoint.

pub mod client;
pub mod error;
pub mod service;
pub mod types;

pub use client::{OpenAiClient, OpenAiConfig};
pub use error::{AiError, AiResult};
pub use service::{frame_prompt, SpeechToText, TextCompletion};
