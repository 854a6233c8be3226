//! Tool for appending a character profile (without an image; image
//! generation is a separate, non-fatal step).

use async_trait::async_trait;
use serde_json::{json, Value};

use lore_core::{Character, StudioAction, ToolCall};

use crate::registry::{StudioTool, ToolContext, ToolError};

pub struct AddCharacterTool;

#[async_trait]
impl StudioTool for AddCharacterTool {
    fn name(&self) -> &str {
        "add_character"
    }

    fn description(&self) -> &str {
        "Add a character to the roster with a full profile. Do not invent an image; images are generated separately."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {"type": "string", "description": "Character name"},
                "role": {"type": "string", "description": "Narrative role, e.g. protagonist, rival"},
                "description": {"type": "string", "description": "Physical and personal description"},
                "backstory": {"type": "string", "description": "Background story"},
                "occupation": {"type": "string", "description": "What they do"},
                "maritalStatus": {"type": "string", "description": "Marital status"},
                "personalityTraits": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Personality traits"
                },
                "abilities": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Optional abilities or skills"
                },
                "motivations": {"type": "string", "description": "What drives them"},
                "fears": {"type": "string", "description": "What they fear"},
                "relationships": {"type": "string", "description": "Ties to other characters"}
            },
            "required": ["name", "role", "description", "backstory", "occupation", "maritalStatus", "personalityTraits"]
        })
    }

    async fn execute(&self, call: &ToolCall, ctx: &ToolContext) -> Result<Value, ToolError> {
        let name = call
            .str_arg("name")
            .ok_or_else(|| ToolError::InvalidArguments("name is required".to_string()))?;

        let mut character = Character::new(name);
        character.role = call.str_arg("role").unwrap_or_default().to_string();
        character.description = call.str_arg("description").unwrap_or_default().to_string();
        character.backstory = call.str_arg("backstory").unwrap_or_default().to_string();
        character.occupation = call.str_arg("occupation").unwrap_or_default().to_string();
        character.marital_status = call.str_arg("maritalStatus").unwrap_or_default().to_string();
        character.personality_traits = call.str_list_arg("personalityTraits");
        character.abilities = call.str_list_arg("abilities");
        character.motivations = call.str_arg("motivations").unwrap_or_default().to_string();
        character.fears = call.str_arg("fears").unwrap_or_default().to_string();
        character.relationships = call.str_arg("relationships").unwrap_or_default().to_string();

        let created = serde_json::to_value(&character)
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        let mut state = ctx.state.write().await;
        state
            .apply(StudioAction::AddCharacter(character))
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        log::info!("add_character: created '{}'", name);
        Ok(json!({"status": "created", "character": created}))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tokio::sync::RwLock;

    use lore_core::StudioState;

    use super::*;

    #[tokio::test]
    async fn appends_character_without_image() {
        let ctx = ToolContext::new(Arc::new(RwLock::new(StudioState::default())), None);
        let call = ToolCall::new(
            "add_character",
            json!({
                "name": "Mira",
                "role": "protagonist",
                "description": "A wary cartographer",
                "backstory": "Raised on the docks",
                "occupation": "Cartographer",
                "maritalStatus": "single",
                "personalityTraits": ["wary", "curious"],
                "motivations": "Map the unmappable"
            })
            .as_object()
            .cloned()
            .unwrap(),
        );
        AddCharacterTool.execute(&call, &ctx).await.unwrap();

        let state = ctx.state.read().await;
        assert_eq!(state.characters.len(), 1);
        let character = &state.characters[0];
        assert_eq!(character.name, "Mira");
        assert_eq!(character.personality_traits, vec!["wary", "curious"]);
        assert!(character.image_url.is_none());
    }
}
