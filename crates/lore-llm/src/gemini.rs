//! Google Gemini provider implementation.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::{json, Value};

use crate::provider::{
    build_http_client, AspectRatio, GenerationError, GenerationProvider, Result, TextRequest,
    TurnRole,
};

/// Google Gemini API provider. Text via `generateContent`, images via the
/// image-capable model variant returning inline base64 data.
pub struct GeminiProvider {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    text_model: String,
    image_model: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: build_http_client(0),
            api_key: api_key.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            text_model: "gemini-2.0-flash".to_string(),
            image_model: "gemini-2.0-flash-preview-image-generation".to_string(),
        }
    }

    /// Set a custom base URL (e.g., for proxies or alternative endpoints).
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

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;

            if status == 401 || status == 403 {
                return Err(GenerationError::Auth(format!(
                    "Gemini authentication failed: {}",
                    text
                )));
            }

            return Err(GenerationError::Api(format!(
                "Gemini API error: HTTP {}: {}",
                status, text
            )));
        }

        Ok(response.json::<Value>().await?)
    }

    fn candidate_parts(payload: &Value) -> &[Value] {
        payload["candidates"]
            .get(0)
            .and_then(|candidate| candidate["content"]["parts"].as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    async fn generate_text(&self, request: &TextRequest) -> Result<String> {
        let contents: Vec<Value> = request
            .turns
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    TurnRole::User => "user",
                    TurnRole::Model => "model",
                };
                json!({"role": role, "parts": [{"text": turn.text}]})
            })
            .collect();

        let mut body = json!({"contents": contents});
        if let Some(system) = &request.system {
            body["systemInstruction"] = json!({"parts": [{"text": system}]});
        }
        if request.json_only {
            body["generationConfig"] = json!({"responseMimeType": "application/json"});
        }

        log::debug!("Gemini text request: model={}", self.text_model);

        let payload = self
            .post_json(&self.generate_url(&self.text_model), &body)
            .await?;

        let text: String = Self::candidate_parts(&payload)
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();

        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }

    async fn generate_image(&self, prompt: &str, aspect_ratio: AspectRatio) -> Result<String> {
        let body = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
            "generationConfig": {
                "responseModalities": ["IMAGE"],
                "imageConfig": {"aspectRatio": aspect_ratio.ratio()},
            },
        });

        log::debug!(
            "Gemini image request: model={}, aspect={}",
            self.image_model,
            aspect_ratio.ratio()
        );

        let payload = self
            .post_json(&self.generate_url(&self.image_model), &body)
            .await?;

        for part in Self::candidate_parts(&payload) {
            // The API has shipped both casings for inline data.
            let inline = part
                .get("inlineData")
                .or_else(|| part.get("inline_data"))
                .and_then(Value::as_object);
            let Some(inline) = inline else { continue };

            let Some(data) = inline.get("data").and_then(Value::as_str) else {
                continue;
            };
            if data.is_empty() {
                continue;
            }
            let mime = inline
                .get("mimeType")
                .or_else(|| inline.get("mime_type"))
                .and_then(Value::as_str)
                .unwrap_or("image/png");
            return Ok(format!("data:{};base64,{}", mime, data));
        }

        Err(GenerationError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn builders_chain() {
        let provider = GeminiProvider::new("test_key")
            .with_base_url("https://custom.googleapis.com/v1")
            .with_text_model("gemini-exp");
        assert_eq!(provider.api_key, "test_key");
        assert_eq!(provider.base_url, "https://custom.googleapis.com/v1");
        assert_eq!(provider.text_model, "gemini-exp");
    }

    #[test]
    fn url_carries_key_as_query_param() {
        let provider = GeminiProvider::new("my_key")
            .with_base_url("https://test.api.com/v1beta")
            .with_text_model("gemini-custom");
        assert_eq!(
            provider.generate_url(&provider.text_model),
            "https://test.api.com/v1beta/models/gemini-custom:generateContent?key=my_key"
        );
    }

    #[tokio::test]
    async fn generate_text_concatenates_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .and(query_param("key", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"role": "model", "parts": [
                    {"text": "hello "}, {"text": "world"}
                ]}}]
            })))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new("test_key").with_base_url(server.uri());
        let text = provider
            .generate_text(&TextRequest::single("hi"))
            .await
            .unwrap();
        assert_eq!(text, "hello world");
    }

    #[tokio::test]
    async fn json_mode_sets_response_mime_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "{}"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GeminiProvider::new("test_key").with_base_url(server.uri());
        provider
            .generate_text(&TextRequest::single("hi").json())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn generate_image_accepts_both_inline_casings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [
                    {"text": "here you go"},
                    {"inline_data": {"mime_type": "image/webp", "data": "Zm9v"}}
                ]}}]
            })))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new("test_key").with_base_url(server.uri());
        let uri = provider
            .generate_image("a harbor", AspectRatio::Square)
            .await
            .unwrap();
        assert_eq!(uri, "data:image/webp;base64,Zm9v");
    }

    #[tokio::test]
    async fn api_failure_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new("test_key").with_base_url(server.uri());
        let err = provider
            .generate_text(&TextRequest::single("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Api(_)));
    }
}
