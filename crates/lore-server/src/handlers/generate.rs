//! The single `/api/generate` dispatcher.
//!
//! One canonical request shape, four actions. Validation runs before any
//! provider work; an unknown action never reaches a provider at all.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use lore_core::{generate_id, ChatMessage, ElementCategory, GameCodex, GameElement, ProjectBrief, ToolCall};
use lore_llm::{AspectRatio, GenerationProvider};
use lore_tools::{builtin_registry, sanitize_tool_calls};

use crate::compose::{self, ChatContext};
use crate::error::AppError;
use crate::state::AppState;
use crate::validate::{
    bounded_text, required_text, MAX_BRIEF_FIELD_LEN, MAX_CHANGE_REQUEST_LEN,
    MAX_IMAGE_PROMPT_LEN, MAX_MESSAGE_LEN,
};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub action: String,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    image_uri: String,
}

#[derive(Debug, Serialize)]
struct ElementsResponse {
    elements: Vec<GameElement>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatResponse {
    text: String,
    tool_calls: Vec<ToolCall>,
}

pub async fn handler(
    state: web::Data<AppState>,
    request: web::Json<GenerateRequest>,
) -> Result<HttpResponse, AppError> {
    let GenerateRequest { action, payload } = request.into_inner();

    // A service without a credential answers 503 to every request.
    let provider = state.provider()?;

    log::debug!("generate action: {}", action);

    match action.as_str() {
        "generate_image" => generate_image(provider, &payload).await,
        "compile_bones" => compile_bones(provider, &payload).await,
        "apply_iteration" => apply_iteration(provider, &payload).await,
        "chat" => chat(provider, &payload).await,
        other => Err(AppError::UnsupportedAction(other.to_string())),
    }
}

async fn generate_image(
    provider: Arc<dyn GenerationProvider>,
    payload: &Value,
) -> Result<HttpResponse, AppError> {
    let prompt = required_text(payload, "prompt", MAX_IMAGE_PROMPT_LEN)?;
    let aspect_ratio = payload
        .get("aspectRatio")
        .and_then(Value::as_str)
        .map(AspectRatio::parse_lenient)
        .unwrap_or_default();

    let image_uri = provider.generate_image(&prompt, aspect_ratio).await?;
    Ok(HttpResponse::Ok().json(ImageResponse { image_uri }))
}

async fn compile_bones(
    provider: Arc<dyn GenerationProvider>,
    payload: &Value,
) -> Result<HttpResponse, AppError> {
    let brief_value = payload
        .get("brief")
        .ok_or_else(|| AppError::validation("brief", "is required"))?;
    let brief: ProjectBrief = serde_json::from_value(brief_value.clone())
        .map_err(|_| AppError::validation("brief", "must be an object of brief fields"))?;

    if brief.is_empty() {
        return Err(AppError::validation("brief", "must not be empty"));
    }
    for (label, value) in brief.fields() {
        bounded_text("brief", value, MAX_BRIEF_FIELD_LEN)
            .map_err(|_| AppError::validation("brief", format!("{} field is too long", label)))?;
    }

    let raw = provider.generate_text(&compose::compile_bones(&brief)).await?;
    let elements = parse_elements(&raw)?;
    Ok(HttpResponse::Ok().json(ElementsResponse { elements }))
}

async fn apply_iteration(
    provider: Arc<dyn GenerationProvider>,
    payload: &Value,
) -> Result<HttpResponse, AppError> {
    let change_request = required_text(payload, "changeRequest", MAX_CHANGE_REQUEST_LEN)?;
    let codex_value = payload
        .get("codex")
        .ok_or_else(|| AppError::validation("codex", "is required"))?;
    let codex: GameCodex = serde_json::from_value(codex_value.clone())
        .map_err(|_| AppError::validation("codex", "must be a codex object"))?;

    let raw = provider
        .generate_text(&compose::apply_iteration(&codex, &change_request))
        .await?;
    // An unusable replacement list fails the request; the caller's codex
    // stays whatever it was. All-or-nothing.
    let elements = parse_elements(&raw)?;
    Ok(HttpResponse::Ok().json(ElementsResponse { elements }))
}

async fn chat(
    provider: Arc<dyn GenerationProvider>,
    payload: &Value,
) -> Result<HttpResponse, AppError> {
    let message = required_text(payload, "message", MAX_MESSAGE_LEN)?;

    // History and context are aggregate blobs: malformed shapes degrade to
    // defaults instead of rejecting the turn.
    let history: Vec<ChatMessage> = payload
        .get("history")
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default();
    let context: ChatContext = payload
        .get("contextData")
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default();

    let schemas = builtin_registry().list_schemas();
    let raw = provider
        .generate_text(&compose::chat(&context, &history, &message, &schemas))
        .await?;

    let (text, tool_calls) = normalize_chat_output(&raw);
    Ok(HttpResponse::Ok().json(ChatResponse { text, tool_calls }))
}

/// Split raw chat output into reply text and sanitized tool calls. Output
/// that cannot be read as the expected object degrades to a plain reply
/// with no tool calls; the turn never fails over formatting.
fn normalize_chat_output(raw: &str) -> (String, Vec<ToolCall>) {
    let Some(parsed) = lore_llm::parse_json_lenient(raw) else {
        return (raw.trim().to_string(), Vec::new());
    };

    let has_contract_keys = parsed.get("text").is_some() || parsed.get("toolCalls").is_some();
    if !has_contract_keys {
        return (raw.trim().to_string(), Vec::new());
    }

    let text = parsed
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let tool_calls = sanitize_tool_calls(parsed.get("toolCalls").unwrap_or(&Value::Null));
    (text, tool_calls)
}

/// Normalize a provider's codex output into typed elements. Entries missing
/// a title or content are dropped; an output with no usable element at all
/// fails the request.
fn parse_elements(raw: &str) -> Result<Vec<GameElement>, AppError> {
    let parsed = lore_llm::parse_json_lenient(raw)
        .ok_or_else(|| AppError::unusable_output("codex output was not JSON"))?;
    let items = parsed
        .get("elements")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::unusable_output("codex output missing elements array"))?;

    let mut elements = Vec::new();
    for item in items {
        let Some(obj) = item.as_object() else { continue };
        let Some(title) = obj
            .get("title")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|title| !title.is_empty())
        else {
            continue;
        };
        let Some(content) = obj
            .get("content")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|content| !content.is_empty())
        else {
            continue;
        };

        let category = obj
            .get("category")
            .and_then(Value::as_str)
            .map(ElementCategory::parse_lenient)
            .unwrap_or(ElementCategory::Story);
        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .unwrap_or_else(generate_id);

        elements.push(GameElement {
            id,
            category,
            title: title.to_string(),
            content: content.to_string(),
        });
    }

    if elements.is_empty() {
        return Err(AppError::unusable_output("codex output had no usable elements"));
    }
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_elements_fills_ids_and_defaults_categories() {
        let raw = r#"{"elements": [
            {"category": "mechanic", "title": "Tides", "content": "The map shifts."},
            {"category": "plot_twist", "title": "Turn", "content": "It was the harbor."},
            {"title": "No category", "content": "Still kept."}
        ]}"#;
        let elements = parse_elements(raw).unwrap();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].category, ElementCategory::Mechanic);
        assert_eq!(elements[1].category, ElementCategory::Story);
        assert_eq!(elements[2].category, ElementCategory::Story);
        assert!(elements.iter().all(|element| !element.id.is_empty()));
    }

    #[test]
    fn parse_elements_drops_incomplete_entries() {
        let raw = r#"{"elements": [
            {"title": "Only title"},
            {"content": "Only content"},
            {"title": "Kept", "content": "Body"}
        ]}"#;
        let elements = parse_elements(raw).unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].title, "Kept");
    }

    #[test]
    fn parse_elements_rejects_unusable_output() {
        assert!(parse_elements("not json at all").is_err());
        assert!(parse_elements(r#"{"elements": "nope"}"#).is_err());
        assert!(parse_elements(r#"{"elements": []}"#).is_err());
        assert!(parse_elements(r#"{"elements": [{"title": ""}]}"#).is_err());
    }

    #[test]
    fn chat_output_recovers_json_from_prose() {
        let (text, calls) =
            normalize_chat_output("Sure! {\"text\":\"hi\",\"toolCalls\":[]} thanks");
        assert_eq!(text, "hi");
        assert!(calls.is_empty());
    }

    #[test]
    fn chat_output_degrades_to_plain_text() {
        let (text, calls) = normalize_chat_output("Just narration, no JSON.");
        assert_eq!(text, "Just narration, no JSON.");
        assert!(calls.is_empty());

        // An object without the contract keys is treated as prose too.
        let (text, calls) = normalize_chat_output(r#"{"unrelated": true}"#);
        assert_eq!(text, r#"{"unrelated": true}"#);
        assert!(calls.is_empty());
    }

    #[test]
    fn chat_output_sanitizes_tool_calls() {
        let raw = r#"{"text": "done", "toolCalls": [
            {"name": "add_task", "args": {"title": "X"}},
            {"name": "drop_database", "args": {}},
            {"badshape": true}
        ]}"#;
        let (text, calls) = normalize_chat_output(raw);
        assert_eq!(text, "done");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "add_task");
    }
}
