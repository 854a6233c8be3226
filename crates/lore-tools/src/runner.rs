//! Sequential tool-call execution.
//!
//! Calls run one at a time in the order the model emitted them; each is
//! awaited before the next starts. An unknown tool name produces an
//! `{"error": "Unknown tool"}` outcome in that slot and the loop continues.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use lore_core::ToolCall;

use crate::registry::{ToolContext, ToolRegistry};

/// The result reported back to the conversational loop for one call.
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutcome {
    pub name: String,
    pub result: Value,
}

pub struct ToolLoop {
    registry: Arc<ToolRegistry>,
    ctx: ToolContext,
}

impl ToolLoop {
    pub fn new(registry: Arc<ToolRegistry>, ctx: ToolContext) -> Self {
        Self { registry, ctx }
    }

    pub async fn run(&self, calls: &[ToolCall]) -> Vec<ToolOutcome> {
        let mut outcomes = Vec::with_capacity(calls.len());

        for call in calls {
            let result = match self.registry.get(&call.name) {
                Some(tool) => match tool.execute(call, &self.ctx).await {
                    Ok(value) => value,
                    Err(error) => {
                        log::warn!("tool '{}' failed: {}", call.name, error);
                        json!({"error": error.to_string()})
                    }
                },
                None => {
                    log::warn!("unknown tool '{}' requested", call.name);
                    json!({"error": "Unknown tool"})
                }
            };

            outcomes.push(ToolOutcome {
                name: call.name.clone(),
                result,
            });
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::sync::RwLock;

    use lore_core::{StudioState, TaskStatus};

    use crate::registry::builtin_registry;

    use super::*;

    fn make_loop() -> (ToolLoop, Arc<RwLock<StudioState>>) {
        let state = Arc::new(RwLock::new(StudioState::default()));
        let ctx = ToolContext::new(Arc::clone(&state), None);
        (ToolLoop::new(Arc::new(builtin_registry()), ctx), state)
    }

    fn call(name: &str, args: Value) -> ToolCall {
        ToolCall::new(name, args.as_object().cloned().unwrap_or_default())
    }

    #[tokio::test]
    async fn executes_calls_in_order() {
        let (tool_loop, state) = make_loop();
        let outcomes = tool_loop
            .run(&[
                call("add_task", json!({"title": "first"})),
                call("add_task", json!({"title": "second", "status": "IN_PROGRESS"})),
            ])
            .await;

        assert_eq!(outcomes.len(), 2);
        let state = state.read().await;
        assert_eq!(state.tasks[0].title, "first");
        assert_eq!(state.tasks[1].title, "second");
        assert_eq!(state.tasks[1].status, TaskStatus::InProgress);
    }

    #[tokio::test]
    async fn unknown_tool_does_not_abort_the_loop() {
        let (tool_loop, state) = make_loop();
        let outcomes = tool_loop
            .run(&[
                call("summon_dragon", json!({})),
                call("add_story_note", json!({"title": "N", "content": "C"})),
            ])
            .await;

        assert_eq!(outcomes[0].result, json!({"error": "Unknown tool"}));
        assert_eq!(outcomes[1].result["status"], "created");
        assert_eq!(state.read().await.notes.len(), 1);
    }

    #[tokio::test]
    async fn invalid_arguments_report_per_call() {
        let (tool_loop, state) = make_loop();
        let outcomes = tool_loop
            .run(&[
                call("add_task", json!({})),
                call("add_task", json!({"title": "ok"})),
            ])
            .await;

        assert!(outcomes[0].result["error"].is_string());
        assert_eq!(state.read().await.tasks.len(), 1);
    }
}
