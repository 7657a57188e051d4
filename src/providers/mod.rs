use crate::core::error::ChatError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod base_client;
pub mod ollama;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn in a conversation, persisted verbatim in the day files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Sends the full conversation and returns the next assistant turn.
    async fn chat(&self, messages: &[Message], model: &str) -> Result<String, ChatError>;
}
