use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::MitigationStrategy;
use crate::mitigation::config::OpenAiCompatMitigationConfig;
use crate::mitigation::error::MitigationError;
use crate::mitigation::parser::decode_text;
use crate::mitigation::types::{MitigationRequest, MitigationService};

const SYSTEM_PROMPT: &str = "You are a supply-chain risk analyst. Reply with JSON only: \
{\"strategies\":[{\"action\":string,\"impact\":\"high\"|\"medium\"|\"low\",\
\"difficulty\":\"high\"|\"medium\"|\"low\",\"timeframe\":string,\"description\":string}]}";

/// Asks any `/chat/completions` compatible model for strategies.
pub struct OpenAiCompatMitigationService {
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiCompatMitigationService {
    pub fn new(
        config: OpenAiCompatMitigationConfig,
        api_key: Option<String>,
    ) -> Result<Self, MitigationError> {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                MitigationError::Config("openai-compat apiKey is required".to_string())
            })?;
        if config.model.trim().is_empty() {
            return Err(MitigationError::Config(
                "openai-compat model cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            model: config.model.trim().to_string(),
            base_url: config.base_url.trim().to_string(),
            max_tokens: config.max_tokens,
            client: reqwest::Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .build()
                .map_err(|error| MitigationError::Config(error.to_string()))?,
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, user: &str) -> Result<String, MitigationError> {
        let endpoint = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.2,
            max_tokens: self.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        tracing::debug!("openai-compat mitigation response: status={}", status);

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(MitigationError::Auth(format!(
                "openai-compat auth failed ({status}). Check API key and account access."
            )));
        }
        if !status.is_success() {
            return Err(MitigationError::Request(format!(
                "openai-compat error {status}: {text}"
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            MitigationError::InvalidResponse(format!("openai-compat parse failed: {e}"))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                MitigationError::InvalidResponse(
                    "missing choices[0].message.content in openai-compat response".to_string(),
                )
            })
    }
}

#[async_trait]
impl MitigationService for OpenAiCompatMitigationService {
    fn id(&self) -> &str {
        "openai-compat"
    }

    async fn suggest(
        &self,
        request: &MitigationRequest,
    ) -> Result<Vec<MitigationStrategy>, MitigationError> {
        let user = format!(
            "Suggest mitigation strategies for this disruption:\n{}",
            serde_json::to_string(request)?
        );
        let content = self.complete(&user).await?;
        decode_text(&content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
