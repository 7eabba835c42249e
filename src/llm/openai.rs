//! Blocking OpenAI chat-completions client.

use crate::config::RunConfig;
use crate::lang::Language;
use crate::llm::prompt::documentation_request;
use crate::llm::types::{ChatMessage, GenerationError};
use crate::llm::DocGenerator;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Generation client for the OpenAI chat-completions API.
///
/// Holds fixed decoding parameters for the whole run; every request carries
/// the same model, temperature, and output bound. Performs no retry of its
/// own — retry policy lives in the splice engine.
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    language: Language,
}

impl OpenAiClient {
    /// Build a client from the run configuration.
    pub fn new(config: &RunConfig) -> Result<Self, GenerationError> {
        if config.api_key.is_empty() {
            return Err(GenerationError::Config("API key is required".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            endpoint: build_endpoint(&config.base_url),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            language: config.language,
        })
    }

    /// Issue one chat-completion request and extract the first choice's text.
    fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, GenerationError> {
        let payload = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GenerationError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            let message: String = message.chars().take(500).collect();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json()?;
        let answer = body
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or(GenerationError::EmptyResponse)?;

        Ok(answer.trim().to_string())
    }
}

impl DocGenerator for OpenAiClient {
    fn generate_docs(&self, code: &str) -> Result<String, GenerationError> {
        let prompt = documentation_request(self.language, code);
        self.chat(vec![ChatMessage::user(prompt)])
    }
}

fn build_endpoint(base_url: &str) -> String {
    format!("{}/v1/chat/completions", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_construction() {
        assert_eq!(
            build_endpoint("https://api.openai.com"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            build_endpoint("https://proxy.example/"),
            "https://proxy.example/v1/chat/completions"
        );
    }

    #[test]
    fn rejects_missing_api_key() {
        let config = RunConfig::new(Language::Python, "");
        assert!(matches!(
            OpenAiClient::new(&config),
            Err(GenerationError::Config(_))
        ));
    }
}
