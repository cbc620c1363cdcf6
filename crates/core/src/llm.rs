//! # LLM Client
//!
//! The seam between the crew and the inference endpoint. The engine only
//! knows [`ChatModel`]; [`OpenAiChat`] is the production implementation
//! for any OpenAI-compatible `/chat/completions` server.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::{CrewError, CrewResult};
use crate::models::ModelConfig;

/// Sampling temperature for every agent turn
const TEMPERATURE: f32 = 0.2;

/// One agent turn: persona framing plus the task prompt
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Persona id issuing the request (used for diagnostics)
    pub agent: String,
    pub system_prompt: String,
    pub user_prompt: String,
}

/// A chat-completion backend
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Return the assistant's text for a single system + user exchange
    async fn complete(&self, request: ChatRequest) -> CrewResult<String>;
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint
#[derive(Debug, Clone)]
pub struct OpenAiChat {
    client: reqwest::Client,
    config: ModelConfig,
}

impl OpenAiChat {
    pub fn new(config: ModelConfig) -> CrewResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    async fn complete(&self, request: ChatRequest) -> CrewResult<String> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": request.system_prompt.trim() },
                { "role": "user", "content": request.user_prompt.trim() }
            ],
            "temperature": TEMPERATURE
        });

        tracing::debug!(
            agent = %request.agent,
            model = %self.config.model,
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.config.chat_completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CrewError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let payload: CompletionResponse = response.json().await?;
        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(CrewError::EmptyCompletion {
                agent: request.agent,
            })
    }
}
