//! Tool-call sanitization.
//!
//! Model output is never trusted: each candidate call must carry a string
//! `name` on the allow-list and an object-typed `args`. Anything malformed
//! is dropped silently so one bad entry does not abort the valid ones.

use serde_json::Value;

use lore_core::ToolCall;

pub const ALLOWED_TOOLS: [&str; 4] = [
    "generate_image",
    "add_task",
    "add_story_note",
    "add_character",
];

/// Filter a raw `toolCalls` value down to well-formed, allow-listed calls.
/// Idempotent: sanitizing an already-sanitized list changes nothing.
pub fn sanitize_tool_calls(raw: &Value) -> Vec<ToolCall> {
    let Some(items) = raw.as_array() else {
        if !raw.is_null() {
            log::warn!("toolCalls was not an array; dropping");
        }
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let name = obj.get("name")?.as_str()?;
            if !ALLOWED_TOOLS.contains(&name) {
                log::warn!("dropping tool call with unknown name '{}'", name);
                return None;
            }
            let args = obj.get("args")?.as_object()?;
            Some(ToolCall::new(name, args.clone()))
        })
        .collect()
}
