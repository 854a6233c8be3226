//! Inbound field validation.
//!
//! Two regimes, deliberately asymmetric: free-text fields are rejected when
//! missing, empty, or oversized; aggregate JSON context is never rejected
//! for size, only serialized and truncated with a marker suffix.

use serde_json::Value;

use crate::error::AppError;

pub const MAX_MESSAGE_LEN: usize = 6000;
pub const MAX_CHANGE_REQUEST_LEN: usize = 4000;
pub const MAX_IMAGE_PROMPT_LEN: usize = 2000;
pub const MAX_BRIEF_FIELD_LEN: usize = 4000;
pub const MAX_CODEX_JSON_LEN: usize = 16_000;
pub const MAX_CONTEXT_JSON_LEN: usize = 24_000;

pub const TRUNCATION_MARKER: &str = "…[truncated]";

/// Extract `field` from `payload` as trimmed non-empty text within
/// `max_len` characters.
pub fn required_text(
    payload: &Value,
    field: &'static str,
    max_len: usize,
) -> Result<String, AppError> {
    let raw = payload
        .get(field)
        .ok_or_else(|| AppError::validation(field, "is required"))?;
    let text = raw
        .as_str()
        .ok_or_else(|| AppError::validation(field, "must be a string"))?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(field, "must not be empty"));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::validation(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }
    Ok(trimmed.to_string())
}

/// Like [`required_text`] but applied to an already-extracted string.
pub fn bounded_text(
    field: &'static str,
    text: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if text.chars().count() > max_len {
        return Err(AppError::validation(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }
    Ok(())
}

/// Serialize `value` and bound it to `max_chars`, appending the truncation
/// marker when cut. Never rejects.
pub fn bounded_json(value: &Value, max_chars: usize) -> String {
    let serialized = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
    truncate_with_marker(&serialized, max_chars)
}

/// Cut `text` to at most `max_chars` characters, marker included.
pub fn truncate_with_marker(text: &str, max_chars: usize) -> String {
    let total = text.chars().count();
    if total <= max_chars {
        return text.to_string();
    }

    let marker_len = TRUNCATION_MARKER.chars().count();
    if max_chars < marker_len {
        // No room for the marker without busting the bound.
        return text.chars().take(max_chars).collect();
    }
    let mut out: String = text.chars().take(max_chars - marker_len).collect();
    out.push_str(TRUNCATION_MARKER);
    out
}
