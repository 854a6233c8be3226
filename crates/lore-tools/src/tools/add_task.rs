//! Tool for appending a task to the project's task list.

use async_trait::async_trait;
use serde_json::{json, Value};

use lore_core::{StudioAction, Task, TaskStatus, ToolCall};

use crate::registry::{StudioTool, ToolContext, ToolError};

pub struct AddTaskTool;

#[async_trait]
impl StudioTool for AddTaskTool {
    fn name(&self) -> &str {
        "add_task"
    }

    fn description(&self) -> &str {
        "Add a task to the project's task board. Use this when the user asks to track a piece of work."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Short task title"
                },
                "description": {
                    "type": "string",
                    "description": "Optional longer description"
                },
                "status": {
                    "type": "string",
                    "enum": ["TODO", "IN_PROGRESS", "DONE"],
                    "description": "Initial status; defaults to TODO"
                }
            },
            "required": ["title"]
        })
    }

    async fn execute(&self, call: &ToolCall, ctx: &ToolContext) -> Result<Value, ToolError> {
        let title = call
            .str_arg("title")
            .ok_or_else(|| ToolError::InvalidArguments("title is required".to_string()))?;

        let status = call
            .str_arg("status")
            .map(TaskStatus::parse_lenient)
            .unwrap_or_default();

        let mut task = Task::new(title).with_status(status);
        if let Some(description) = call.str_arg("description") {
            task = task.with_description(description);
        }

        let created = serde_json::to_value(&task)
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        let mut state = ctx.state.write().await;
        state
            .apply(StudioAction::AddTask(task))
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        log::info!("add_task: created '{}'", title);
        Ok(json!({"status": "created", "task": created}))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tokio::sync::RwLock;

    use lore_core::StudioState;

    use super::*;

    fn ctx() -> ToolContext {
        ToolContext::new(Arc::new(RwLock::new(StudioState::default())), None)
    }

    fn call(args: Value) -> ToolCall {
        ToolCall::new("add_task", args.as_object().cloned().unwrap_or_default())
    }

    #[tokio::test]
    async fn appends_task_with_given_status() {
        let ctx = ctx();
        let result = AddTaskTool
            .execute(
                &call(json!({"title": "Write intro", "status": "IN_PROGRESS"})),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(result["status"], "created");

        let state = ctx.state.read().await;
        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.tasks[0].title, "Write intro");
        assert_eq!(state.tasks[0].status, TaskStatus::InProgress);
    }

    #[tokio::test]
    async fn unknown_status_defaults_to_todo() {
        let ctx = ctx();
        AddTaskTool
            .execute(&call(json!({"title": "X", "status": "WAITING"})), &ctx)
            .await
            .unwrap();
        let state = ctx.state.read().await;
        assert_eq!(state.tasks[0].status, TaskStatus::Todo);
    }

    #[tokio::test]
    async fn missing_title_is_invalid() {
        let ctx = ctx();
        let err = AddTaskTool
            .execute(&call(json!({"description": "no title"})), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(ctx.state.read().await.tasks.is_empty());
    }
}
