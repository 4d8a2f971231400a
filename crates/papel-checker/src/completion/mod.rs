//! Chat-completion collaborator used to grade essays.
//!
//! The checker only depends on [`CompletionClient`]; [`GroqClient`] is the
//! production implementation for OpenAI-compatible endpoints.

mod groq;

pub use groq::GroqClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A chat message for completion requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user" or "assistant"
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Token accounting reported by the API; absent counts are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Raw assistant text plus usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub usage: TokenUsage,
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion API rejected the credentials")]
    Unauthorized,
    #[error("completion API rate limit exceeded")]
    RateLimited,
    #[error("completion API returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("completion request timed out after {0:?}")]
    Timeout(Duration),
    #[error("completion request failed: {0}")]
    Transport(String),
    #[error("unexpected completion payload: {0}")]
    MalformedResponse(String),
}

/// Backend able to answer a chat-completion request.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<Completion, CompletionError>;

    /// Model identifier reported by health checks.
    fn model(&self) -> &str;
}
