//! Text generation over an OpenAI-compatible chat-completions API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{
    app_error::{AppError, AppResult},
    application::ports::text_generator::TextGenerator,
    infra::{InfraError, config::LlmConfig},
};

const TEMPERATURE: f64 = 0.5;
const TOP_P: f64 = 0.8;

pub struct OpenAiCompatibleGenerator {
    client: Client,
    api_key: SecretString,
    chat_url: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiCompatibleGenerator {
    pub fn new(config: &LlmConfig) -> Result<Self, InfraError> {
        // the pipeline enforces the per-stage deadline; this bounds a stuck connection
        let client = Client::builder()
            .timeout(config.timeout * 2)
            .build()
            .map_err(InfraError::HttpClient)?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            chat_url: format!("{}/chat/completions", config.base_url.as_str().trim_end_matches('/')),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn to_request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleGenerator {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "Sending chat completion request");

        let response = self
            .client
            .post(&self.chat_url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&self.to_request(prompt))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Chat completion request failed");
                AppError::GenerationFailed("text generation service unreachable".into())
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = %status, body = %text, "Chat completion API error");
            return Err(AppError::GenerationFailed(describe_status(status)));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Chat completion response could not be decoded");
            AppError::GenerationFailed("invalid response from text generation service".into())
        })?;

        extract_text(body)
    }
}

fn describe_status(status: StatusCode) -> String {
    match status.as_u16() {
        429 => "text generation service rate limited the request".into(),
        401 | 403 => "text generation service rejected the credentials".into(),
        s if s >= 500 => "text generation service unavailable".into(),
        _ => format!("text generation service returned {status}"),
    }
}

fn extract_text(body: ChatResponse) -> AppResult<String> {
    body.choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| AppError::GenerationFailed("empty completion".into()))
}

// === Chat Completions API Types ===

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
