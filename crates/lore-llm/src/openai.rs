//! OpenAI provider implementation.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::{json, Value};

use crate::provider::{
    build_http_client, AspectRatio, GenerationError, GenerationProvider, Result, TextRequest,
    TurnRole,
};

/// OpenAI API provider: chat completions for text, the images endpoint for
/// image generation.
pub struct OpenAIProvider {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    text_model: String,
    image_model: String,
}

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: build_http_client(0),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            text_model: "gpt-4o-mini".to_string(),
            image_model: "gpt-image-1".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.client = build_http_client(max_retries);
        self
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;

            if status == 401 || status == 403 {
                return Err(GenerationError::Auth(format!(
                    "OpenAI authentication failed: {}",
                    text
                )));
            }

            return Err(GenerationError::Api(format!(
                "OpenAI API error: HTTP {}: {}",
                status, text
            )));
        }

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl GenerationProvider for OpenAIProvider {
    async fn generate_text(&self, request: &TextRequest) -> Result<String> {
        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(json!({"role": "system", "content": system}));
        }
        for turn in &request.turns {
            let role = match turn.role {
                TurnRole::User => "user",
                TurnRole::Model => "assistant",
            };
            messages.push(json!({"role": role, "content": turn.text}));
        }

        let mut body = json!({
            "model": self.text_model,
            "messages": messages,
        });
        if request.json_only {
            body["response_format"] = json!({"type": "json_object"});
        }

        log::debug!("OpenAI text request: model={}", self.text_model);

        let payload = self
            .post_json(&format!("{}/chat/completions", self.base_url), &body)
            .await?;

        payload["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str())
            .map(str::to_string)
            .filter(|content| !content.is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }

    async fn generate_image(&self, prompt: &str, aspect_ratio: AspectRatio) -> Result<String> {
        let body = json!({
            "model": self.image_model,
            "prompt": prompt,
            "n": 1,
            "size": aspect_ratio.openai_size(),
        });

        log::debug!(
            "OpenAI image request: model={}, size={}",
            self.image_model,
            aspect_ratio.openai_size()
        );

        let payload = self
            .post_json(&format!("{}/images/generations", self.base_url), &body)
            .await?;

        payload["data"]
            .get(0)
            .and_then(|row| row["b64_json"].as_str())
            .map(|b64| format!("data:image/png;base64,{}", b64))
            .ok_or(GenerationError::EmptyResponse)
    }
}
