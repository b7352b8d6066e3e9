//! Mock provider implementations for testing.

use super::{ChatMessage, ChatProvider, GenerationParams, ProviderError};
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock chat provider for testing.
///
/// Replays scripted outcomes in order, then falls back to a default reply
/// (or failure when none is set). Records every message list it receives so
/// tests can assert on prompt composition.
pub struct MockChatProvider {
    script: Mutex<Vec<Result<String, ProviderError>>>,
    default_reply: Option<String>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatProvider {
    /// Provider that always answers with the given text.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(Vec::new()),
            default_reply: Some(reply.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Provider that always fails.
    pub fn failing() -> Self {
        Self {
            script: Mutex::new(Vec::new()),
            default_reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Provider that replays the given outcomes in order, then fails.
    pub fn scripted(mut script: Vec<Result<String, ProviderError>>) -> Self {
        script.reverse();
        Self {
            script: Mutex::new(script),
            default_reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Message lists received so far, oldest first.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(messages.to_vec());

        if let Some(outcome) = self.script.lock().unwrap().pop() {
            return outcome;
        }

        match &self.default_reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(ProviderError::NetworkError(
                "Mock provider configured to fail".to_string(),
            )),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
