//! Vision client
//!
//! Image-understanding capability over the same chat-completions endpoint,
//! with the image attached as a base64 data URL. The caller has already
//! checked that the path exists and carries a supported extension.

use async_trait::async_trait;
use attrx_core::capability::{CapabilityError, CapabilityResult, VisionModel};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

use crate::chat::{ChatClient, ModelConfig};

/// Vision-model client. Wraps a [`ChatClient`] with its own model name so
/// the chat and vision models can differ.
#[derive(Clone)]
pub struct VisionClient {
    inner: ChatClient,
    config: ModelConfig,
}

impl VisionClient {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            inner: ChatClient::new(config.clone()),
            config,
        }
    }

    /// Create from `ATTRX_API_KEY` / `ATTRX_API_BASE` / `ATTRX_VISION_MODEL`.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(ModelConfig::from_env("ATTRX_VISION_MODEL")?))
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.config.model
    }
}

fn mime_type(image: &Path) -> &'static str {
    match image
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

#[async_trait]
impl VisionModel for VisionClient {
    async fn describe(&self, image: &Path, question: &str) -> CapabilityResult<String> {
        let bytes = tokio::fs::read(image)
            .await
            .map_err(|e| CapabilityError::VisionModel(format!("unreadable image: {e}")))?;
        let data_url = format!("data:{};base64,{}", mime_type(image), STANDARD.encode(bytes));

        let messages = serde_json::json!([{
            "role": "user",
            "content": [
                {"type": "text", "text": question},
                {"type": "image_url", "image_url": {"url": data_url}},
            ],
        }]);

        self.inner
            .call_api(&self.config, messages, 100)
            .await
            .map_err(|e| CapabilityError::VisionModel(e.to_string()))
    }
}
