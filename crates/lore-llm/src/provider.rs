use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest_middleware::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("provider returned no usable content")]
    EmptyResponse,
}

impl From<reqwest::Error> for GenerationError {
    fn from(error: reqwest::Error) -> Self {
        GenerationError::Http(reqwest_middleware::Error::Reqwest(error))
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;

/// The small fixed set of supported image shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AspectRatio {
    #[default]
    Square,
    Portrait,
    Landscape,
    Wide,
    Tall,
}

impl AspectRatio {
    /// Parse the wire form ("1:1", "3:4", ...). Unknown values fall back
    /// to square rather than failing the image request.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim() {
            "3:4" => AspectRatio::Portrait,
            "4:3" => AspectRatio::Landscape,
            "16:9" => AspectRatio::Wide,
            "9:16" => AspectRatio::Tall,
            _ => AspectRatio::Square,
        }
    }

    pub fn ratio(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Wide => "16:9",
            AspectRatio::Tall => "9:16",
        }
    }

    /// Pixel dimensions for providers that take a size, not a ratio.
    pub fn openai_size(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1024x1024",
            AspectRatio::Portrait | AspectRatio::Tall => "1024x1536",
            AspectRatio::Landscape | AspectRatio::Wide => "1536x1024",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Model,
}

#[derive(Debug, Clone)]
pub struct PromptTurn {
    pub role: TurnRole,
    pub text: String,
}

impl PromptTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// A composed text-generation request, provider-agnostic.
#[derive(Debug, Clone, Default)]
pub struct TextRequest {
    pub system: Option<String>,
    pub turns: Vec<PromptTurn>,
    /// Ask the provider for a strict-JSON response where it supports that.
    pub json_only: bool,
}

impl TextRequest {
    pub fn single(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            turns: vec![PromptTurn::user(prompt)],
            json_only: false,
        }
    }

    pub fn json(mut self) -> Self {
        self.json_only = true;
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// One adapter per backend provider, selected by configuration.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Single-shot text generation. Returns the raw output text; callers
    /// that expect JSON run it through the lenient recovery parser.
    async fn generate_text(&self, request: &TextRequest) -> Result<String>;

    /// Single-shot image generation. Returns a `data:image/...;base64,`
    /// URI ready for the client to display.
    async fn generate_image(&self, prompt: &str, aspect_ratio: AspectRatio) -> Result<String>;
}

/// Shared HTTP client construction: retry middleware with exponential
/// backoff. `max_retries == 0` keeps the source's single-shot behavior.
pub(crate) fn build_http_client(max_retries: u32) -> ClientWithMiddleware {
    let retry_policy = ExponentialBackoff::builder()
        .retry_bounds(Duration::from_millis(100), Duration::from_secs(5))
        .build_with_max_retries(max_retries);

    ClientBuilder::new(Client::new())
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_parses_wire_values() {
        assert_eq!(AspectRatio::parse_lenient("16:9"), AspectRatio::Wide);
        assert_eq!(AspectRatio::parse_lenient(" 3:4 "), AspectRatio::Portrait);
        assert_eq!(AspectRatio::parse_lenient("2:1"), AspectRatio::Square);
        assert_eq!(AspectRatio::parse_lenient(""), AspectRatio::Square);
    }

    #[test]
    fn aspect_ratio_maps_to_fixed_pixel_set() {
        assert_eq!(AspectRatio::Square.openai_size(), "1024x1024");
        assert_eq!(AspectRatio::Tall.openai_size(), "1024x1536");
        assert_eq!(AspectRatio::Wide.openai_size(), "1536x1024");
    }

    #[test]
    fn text_request_builders() {
        let request = TextRequest::single("hello").json().with_system("sys");
        assert!(request.json_only);
        assert_eq!(request.system.as_deref(), Some("sys"));
        assert_eq!(request.turns.len(), 1);
        assert_eq!(request.turns[0].role, TurnRole::User);
    }
}
