//! Chat provider abstractions and implementations.
//!
//! Trait-based seam for the language-generation capability, allowing easy
//! swapping between backends (OpenAI, mock).

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Empty response from provider")]
    EmptyResponse,
}

/// One turn supplied to the generation capability.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    /// Role: "system", "user" or "assistant".
    pub role: String,

    /// Message content.
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

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Generation parameters, fixed per-deployment.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    /// Temperature (0.0 - 2.0).
    pub temperature: f32,

    /// Maximum output tokens.
    pub max_tokens: i32,
}

/// Trait for chat-completion providers (e.g., OpenAI).
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Generate a completion for the given message list.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
