//! Chat-completions client
//!
//! OpenAI-compatible endpoint client used for the text-completion
//! capability. Temperature is pinned to zero: the pipeline compares answers
//! literally against controlled vocabularies.

use async_trait::async_trait;
use attrx_core::capability::{CapabilityError, CapabilityResult, ChatModel};
use serde::Deserialize;
use tracing::debug;

/// Default system prompt: answer tersely, return only the requested value.
const SYSTEM_PROMPT: &str =
    "你是一个专业的电商产品属性分析助手，请简洁直接地回答问题，仅返回所需结果。";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Endpoint configuration shared by the chat and vision clients.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl ModelConfig {
    /// Read the configuration from `ATTRX_API_BASE`, `ATTRX_API_KEY` and a
    /// caller-chosen model variable, with OpenAI defaults.
    pub fn from_env(model_var: &str) -> anyhow::Result<Self> {
        let api_key = std::env::var("ATTRX_API_KEY")
            .map_err(|_| anyhow::anyhow!("ATTRX_API_KEY environment variable not set"))?;
        let base_url =
            std::env::var("ATTRX_API_BASE").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var(model_var).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self {
            base_url,
            api_key,
            model,
        })
    }
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

/// Text-completion client.
#[derive(Clone)]
pub struct ChatClient {
    config: ModelConfig,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create from `ATTRX_API_KEY` / `ATTRX_API_BASE` / `ATTRX_CHAT_MODEL`.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(ModelConfig::from_env("ATTRX_CHAT_MODEL")?))
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.config.model
    }

    pub(crate) async fn call_api(
        &self,
        config: &ModelConfig,
        messages: serde_json::Value,
        max_tokens: u32,
    ) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "model": &config.model,
            "messages": messages,
            "temperature": 0.0,
            "max_tokens": max_tokens,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", config.base_url))
            .header("Authorization", format!("Bearer {}", config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error {status}: {body}");
        }

        let api_response: ApiResponse = response.json().await?;
        let content = api_response
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| anyhow::anyhow!("no choices in response"))?;
        debug!("model answer: {content:?}");
        Ok(content)
    }
}

#[async_trait]
impl ChatModel for ChatClient {
    async fn complete(&self, prompt: &str) -> CapabilityResult<String> {
        let messages = serde_json::json!([
            {"role": "system", "content": SYSTEM_PROMPT},
            {"role": "user", "content": prompt},
        ]);
        self.call_api(&self.config, messages, 1000)
            .await
            .map_err(|e| CapabilityError::ChatModel(e.to_string()))
    }
}
