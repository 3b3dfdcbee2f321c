//! LLM provider client (OpenAI-compatible chat completions).
//!
//! Backs the chat, dictionary, and pronunciation proxy endpoints. The
//! dictionary/pronunciation flavors are just fixed system prompts wrapped
//! around the user's input.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::UpstreamError;
use crate::config::LlmConfig;

/// A single chat message in the provider's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
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

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Client for the LLM provider's chat-completions endpoint.
pub struct LlmClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LlmClient {
    /// Build a client with a pre-configured timeout.
    pub fn new(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    /// Run one chat completion and return the assistant's reply text.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, UpstreamError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::MalformedResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| UpstreamError::MalformedResponse("empty choices array".to_string()))
    }
}
