use std::sync::Arc;

use lore_llm::{GeminiProvider, GenerationProvider, OpenAIProvider};

use crate::error::AppError;

/// Per-process service state. The provider is the only process-wide
/// resource; requests share nothing else. `None` means the service came up
/// without a credential and answers 503 to every generate request.
pub struct AppState {
    provider: Option<Arc<dyn GenerationProvider>>,
}

impl AppState {
    pub fn new_with_config(
        provider: &str,
        api_key: Option<String>,
        base_url: Option<String>,
        text_model: Option<String>,
        image_model: Option<String>,
        max_retries: u32,
    ) -> Self {
        let Some(api_key) = api_key.filter(|key| !key.trim().is_empty()) else {
            log::error!("no generation API key configured; all generate requests will fail");
            return Self { provider: None };
        };

        log::info!(
            "creating generation provider: {} (retries: {})",
            provider,
            max_retries
        );

        let provider: Arc<dyn GenerationProvider> = match provider {
            "openai" => {
                let mut p = OpenAIProvider::new(api_key).with_max_retries(max_retries);
                if let Some(url) = base_url {
                    p = p.with_base_url(url);
                }
                if let Some(model) = text_model {
                    p = p.with_text_model(model);
                }
                if let Some(model) = image_model {
                    p = p.with_image_model(model);
                }
                Arc::new(p)
            }
            _ => {
                let mut p = GeminiProvider::new(api_key).with_max_retries(max_retries);
                if let Some(url) = base_url {
                    p = p.with_base_url(url);
                }
                if let Some(model) = text_model {
                    p = p.with_text_model(model);
                }
                if let Some(model) = image_model {
                    p = p.with_image_model(model);
                }
                Arc::new(p)
            }
        };

        Self {
            provider: Some(provider),
        }
    }

    /// Inject a ready-made provider (used by tests and embedders).
    pub fn with_provider(provider: Arc<dyn GenerationProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn unconfigured() -> Self {
        Self { provider: None }
    }

    pub fn provider(&self) -> Result<Arc<dyn GenerationProvider>, AppError> {
        self.provider
            .as_ref()
            .map(Arc::clone)
            .ok_or(AppError::Misconfigured)
    }
}
