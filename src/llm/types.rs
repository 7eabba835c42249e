use serde::Serialize;
use thiserror::Error;

/// One role-tagged message in a chat-completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum GenerationError {
    /// The service's quota/backoff signal (HTTP 429). Recovered once by the
    /// splice engine with a fixed cooldown; never retried here.
    #[error("generation service rate limit exceeded")]
    RateLimited,

    #[error("generation service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation service returned no choices")]
    EmptyResponse,

    #[error("invalid generation client configuration: {0}")]
    Config(String),
}
