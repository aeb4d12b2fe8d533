use serde::{Deserialize, Serialize};

use crate::config::GenerativeConfig;
use crate::error::Error;

/// Client for the generative-answer provider. One non-streaming chat
/// completion per search request.
pub struct GenerativeClient {
    http: reqwest::Client,
    config: GenerativeConfig,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl GenerativeClient {
    pub fn new(http: reqwest::Client, config: GenerativeConfig) -> Self {
        Self { http, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Send one prompt and return the model's text.
    pub async fn generate(&self, prompt: &str) -> Result<String, Error> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(Error::ProviderUnavailable {
                provider: "generative",
            })?;

        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let req = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.2,
        };

        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&req)
            .send()
            .await
            .map_err(|e| Error::Provider {
                provider: "generative",
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Provider {
                provider: "generative",
                reason: format!("API returned {status}: {body}"),
            });
        }

        let body: ChatResponse = resp.json().await.map_err(|e| Error::Provider {
            provider: "generative",
            reason: format!("unparseable response: {e}"),
        })?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(Error::Provider {
                provider: "generative",
                reason: "response contained no choices".to_string(),
            })
    }
}
