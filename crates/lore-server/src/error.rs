use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use lore_llm::GenerationError;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// The error taxonomy of the generate boundary. Validation problems are
/// caller-fixable and safe to describe; provider failures are logged
/// server-side and surfaced as a terse opaque message; a missing credential
/// is never named.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("unsupported action '{0}'")]
    UnsupportedAction(String),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("generation service is not configured")]
    Misconfigured,
}

impl AppError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Provider output that parsed as nothing usable. Internally carried as
    /// a generation failure so the client sees the same opaque 500.
    pub fn unusable_output(detail: impl Into<String>) -> Self {
        AppError::Generation(GenerationError::Api(detail.into()))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::UnsupportedAction(_) => StatusCode::BAD_REQUEST,
            AppError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Misconfigured => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation { field, reason } => ErrorBody {
                error: "Validation failed".to_string(),
                details: Some(format!("{}: {}", field, reason)),
            },
            AppError::UnsupportedAction(action) => ErrorBody {
                error: "Unsupported action".to_string(),
                details: Some(action.clone()),
            },
            AppError::Generation(inner) => {
                // Provider detail stays in the server log.
                log::error!("generation failed: {}", inner);
                ErrorBody {
                    error: "Generation failed. Please try again.".to_string(),
                    details: None,
                }
            }
            AppError::Misconfigured => ErrorBody {
                error: "Generation service is unavailable".to_string(),
                details: None,
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            AppError::validation("message", "must not be empty").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UnsupportedAction("reboot".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Generation(GenerationError::EmptyResponse).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Misconfigured.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn generation_body_is_opaque() {
        let error = AppError::Generation(GenerationError::Api(
            "HTTP 500: provider stack trace".to_string(),
        ));
        let response = error.error_response();
        let bytes = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Generation failed. Please try again.");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn misconfigured_body_never_names_the_credential() {
        let bytes = actix_web::body::to_bytes(AppError::Misconfigured.error_response().into_body())
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.to_lowercase().contains("key"));
    }
}
