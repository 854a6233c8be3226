//! Tool for nested image generation during a chat turn.
//!
//! Image failures are never fatal to the surrounding conversation: the
//! tool reports `{"status": "unavailable"}` instead of erroring, and the
//! chat continues without the image.

use async_trait::async_trait;
use serde_json::{json, Value};

use lore_core::ToolCall;
use lore_llm::AspectRatio;

use crate::registry::{StudioTool, ToolContext, ToolError};

pub struct GenerateImageTool;

#[async_trait]
impl StudioTool for GenerateImageTool {
    fn name(&self) -> &str {
        "generate_image"
    }

    fn description(&self) -> &str {
        "Generate an illustration from a text prompt. Returns a data URI the client can display inline."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "What to draw, including style cues"
                },
                "aspectRatio": {
                    "type": "string",
                    "enum": ["1:1", "3:4", "4:3", "16:9", "9:16"],
                    "description": "Optional aspect ratio; defaults to 1:1"
                }
            },
            "required": ["prompt"]
        })
    }

    async fn execute(&self, call: &ToolCall, ctx: &ToolContext) -> Result<Value, ToolError> {
        let prompt = call
            .str_arg("prompt")
            .ok_or_else(|| ToolError::InvalidArguments("prompt is required".to_string()))?;

        let aspect_ratio = call
            .str_arg("aspectRatio")
            .map(AspectRatio::parse_lenient)
            .unwrap_or_default();

        let Some(provider) = &ctx.provider else {
            log::warn!("generate_image: no provider configured");
            return Ok(json!({"status": "unavailable", "uri": null}));
        };

        match provider.generate_image(prompt, aspect_ratio).await {
            Ok(uri) => Ok(json!({"status": "ok", "uri": uri})),
            Err(error) => {
                log::warn!("generate_image failed: {}", error);
                Ok(json!({"status": "unavailable", "uri": null}))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tokio::sync::RwLock;

    use lore_core::StudioState;
    use lore_llm::{GenerationError, GenerationProvider, Result as LlmResult, TextRequest};

    use super::*;

    struct FixedImageProvider {
        fail: bool,
    }

    #[async_trait]
    impl GenerationProvider for FixedImageProvider {
        async fn generate_text(&self, _request: &TextRequest) -> LlmResult<String> {
            Err(GenerationError::EmptyResponse)
        }

        async fn generate_image(&self, _prompt: &str, _aspect: AspectRatio) -> LlmResult<String> {
            if self.fail {
                Err(GenerationError::Api("quota exceeded".to_string()))
            } else {
                Ok("data:image/png;base64,Zm9v".to_string())
            }
        }
    }

    fn ctx(provider: Option<Arc<dyn GenerationProvider>>) -> ToolContext {
        ToolContext::new(Arc::new(RwLock::new(StudioState::default())), provider)
    }

    fn call(args: Value) -> ToolCall {
        ToolCall::new("generate_image", args.as_object().cloned().unwrap())
    }

    #[tokio::test]
    async fn returns_data_uri_on_success() {
        let ctx = ctx(Some(Arc::new(FixedImageProvider { fail: false })));
        let result = GenerateImageTool
            .execute(&call(json!({"prompt": "a harbor", "aspectRatio": "16:9"})), &ctx)
            .await
            .unwrap();
        assert_eq!(result["status"], "ok");
        assert_eq!(result["uri"], "data:image/png;base64,Zm9v");
    }

    #[tokio::test]
    async fn provider_failure_is_not_fatal() {
        let ctx = ctx(Some(Arc::new(FixedImageProvider { fail: true })));
        let result = GenerateImageTool
            .execute(&call(json!({"prompt": "a harbor"})), &ctx)
            .await
            .unwrap();
        assert_eq!(result["status"], "unavailable");
        assert!(result["uri"].is_null());
    }

    #[tokio::test]
    async fn missing_provider_is_not_fatal() {
        let ctx = ctx(None);
        let result = GenerateImageTool
            .execute(&call(json!({"prompt": "a harbor"})), &ctx)
            .await
            .unwrap();
        assert_eq!(result["status"], "unavailable");
    }
}
