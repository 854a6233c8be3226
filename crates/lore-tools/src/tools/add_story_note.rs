//! Tool for appending a story note.

use async_trait::async_trait;
use serde_json::{json, Value};

use lore_core::{StoryNote, StudioAction, ToolCall};

use crate::registry::{StudioTool, ToolContext, ToolError};

pub struct AddStoryNoteTool;

#[async_trait]
impl StudioTool for AddStoryNoteTool {
    fn name(&self) -> &str {
        "add_story_note"
    }

    fn description(&self) -> &str {
        "Record a story note: worldbuilding detail, plot thread, or any idea worth keeping."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Note title"
                },
                "content": {
                    "type": "string",
                    "description": "Note body"
                },
                "tags": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Optional tags"
                }
            },
            "required": ["title", "content"]
        })
    }

    async fn execute(&self, call: &ToolCall, ctx: &ToolContext) -> Result<Value, ToolError> {
        let title = call
            .str_arg("title")
            .ok_or_else(|| ToolError::InvalidArguments("title is required".to_string()))?;
        let content = call
            .str_arg("content")
            .ok_or_else(|| ToolError::InvalidArguments("content is required".to_string()))?;

        let note = StoryNote::new(title, content, call.str_list_arg("tags"));
        let created = serde_json::to_value(&note)
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        let mut state = ctx.state.write().await;
        state
            .apply(StudioAction::AddStoryNote(note))
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        log::info!("add_story_note: created '{}'", title);
        Ok(json!({"status": "created", "note": created}))
    }
}
