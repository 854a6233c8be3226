//! Prompt composition for the three text-generation actions.
//!
//! Context embedding is bounded everywhere: full codex and character sets
//! grow without limit, so summaries use fixed character caps and the raw
//! context JSON is truncated rather than counted in tokens.

use serde::Deserialize;
use serde_json::{json, Value};

use lore_core::{Character, ChatMessage, ChatRole, ElementCategory, GameCodex, ProjectBrief};
use lore_llm::{PromptTurn, TextRequest};
use lore_tools::ToolSchema;

use crate::validate::{bounded_json, MAX_CODEX_JSON_LEN, MAX_CONTEXT_JSON_LEN};

/// How much of each element's content reaches the chat prompt.
const ELEMENT_PREVIEW_CHARS: usize = 100;
/// How many transcript turns the backend ever sees.
pub const HISTORY_WINDOW: usize = 10;

/// The aggregate context the client sends with each chat turn. Unknown or
/// malformed members fall back to defaults; context is advisory, not
/// validated input.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatContext {
    pub tasks: Value,
    pub notes: Value,
    pub characters: Vec<Character>,
    pub brief: ProjectBrief,
    pub codex: GameCodex,
}

fn category_list() -> String {
    ElementCategory::ALL
        .iter()
        .map(|category| format!("\"{}\"", category.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn brief_block(brief: &ProjectBrief) -> String {
    brief
        .fields()
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(label, value)| format!("{}: {}", label, value.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Instruction to synthesize a fresh codex from the project brief.
pub fn compile_bones(brief: &ProjectBrief) -> TextRequest {
    let prompt = format!(
        "You are a narrative designer. From the project brief below, compile the \
         \"bones\" of the project: a set of concise design elements covering its \
         premise, mechanics, story, visual direction, and character arcs.\n\n\
         Project brief:\n{}\n\n\
         Respond with a JSON object of the shape {{\"elements\": [{{\"category\": ..., \
         \"title\": ..., \"content\": ...}}]}}. Every \"category\" must be one of \
         {}. Produce at least one element per category. No prose outside the JSON.",
        brief_block(brief),
        category_list(),
    );
    TextRequest::single(prompt).json()
}

/// Instruction to rework the current codex according to a change request.
/// The model must return the complete replacement list; nothing it leaves
/// out survives.
pub fn apply_iteration(codex: &GameCodex, change_request: &str) -> TextRequest {
    let codex_json = bounded_json(
        &serde_json::to_value(codex).unwrap_or(Value::Null),
        MAX_CODEX_JSON_LEN,
    );
    let prompt = format!(
        "You are a narrative designer revising an existing design codex.\n\n\
         Current codex (JSON):\n{}\n\n\
         Change request:\n{}\n\n\
         Apply the change request and respond with the COMPLETE replacement element \
         list as a JSON object {{\"elements\": [...]}} — include every element that \
         should exist afterwards, not only the changed ones. Elements you omit will \
         be deleted. Every \"category\" must be one of {}. No prose outside the JSON.",
        codex_json,
        change_request,
        category_list(),
    );
    TextRequest::single(prompt).json()
}

/// System/user instruction pair for a chat turn: bounded summaries of the
/// codex and roster, the tool contract, the recent history window, and the
/// new message.
pub fn chat(
    context: &ChatContext,
    history: &[ChatMessage],
    message: &str,
    tools: &[ToolSchema],
) -> TextRequest {
    let mut system = String::from(
        "You are the creative-writing assistant of a narrative-design studio. \
         Help the user develop their project: discuss ideas, and use tools to \
         record concrete outcomes.\n\n\
         Respond with STRICT JSON only, of the shape \
         {\"text\": \"your reply\", \"toolCalls\": [{\"name\": ..., \"args\": {...}}]}. \
         \"toolCalls\" must be an empty array when no tool is needed.\n",
    );

    system.push_str("\nAvailable tools:\n");
    for tool in tools {
        system.push_str(&format!(
            "- {}: {} Parameters: {}\n",
            tool.name,
            tool.description,
            serde_json::to_string(&tool.parameters).unwrap_or_default()
        ));
    }

    if !context.codex.elements.is_empty() {
        system.push_str("\nCurrent codex:\n");
        for element in &context.codex.elements {
            let preview: String = element.content.chars().take(ELEMENT_PREVIEW_CHARS).collect();
            system.push_str(&format!(
                "- [{}] {}: {}\n",
                element.category.as_str(),
                element.title,
                preview
            ));
        }
    }

    if !context.characters.is_empty() {
        system.push_str("\nCharacters:\n");
        for character in &context.characters {
            system.push_str(&format!(
                "- {} ({}): {}\n",
                character.name, character.role, character.motivations
            ));
        }
    }

    let extra = json!({
        "brief": context.brief,
        "tasks": context.tasks,
        "notes": context.notes,
    });
    system.push_str("\nProject context (may be truncated):\n");
    system.push_str(&bounded_json(&extra, MAX_CONTEXT_JSON_LEN));

    let mut request = TextRequest::default().with_system(system).json();

    let start = history.len().saturating_sub(HISTORY_WINDOW);
    for entry in &history[start..] {
        match entry.role {
            ChatRole::User => request.turns.push(PromptTurn::user(entry.content.clone())),
            ChatRole::Model => request.turns.push(PromptTurn::model(entry.content.clone())),
            // System entries are client-side decoration, never replayed.
            ChatRole::System => {}
        }
    }
    request.turns.push(PromptTurn::user(message));

    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::TRUNCATION_MARKER;
    use lore_core::GameElement;

    fn sample_context() -> ChatContext {
        let mut context = ChatContext::default();
        context.codex = GameCodex::new(vec![GameElement::new(
            ElementCategory::Premise,
            "Hook",
            "A city that sleeps through winter.".repeat(10),
        )]);
        let mut character = Character::new("Mira");
        character.role = "protagonist".into();
        character.motivations = "map the unmappable".into();
        context.characters.push(character);
        context
    }

    #[test]
    fn compile_bones_names_all_categories() {
        let brief = ProjectBrief {
            title: "Harborlight".into(),
            genre: "mystery".into(),
            ..Default::default()
        };
        let request = compile_bones(&brief);
        assert!(request.json_only);
        let prompt = &request.turns[0].text;
        assert!(prompt.contains("Harborlight"));
        for category in ElementCategory::ALL {
            assert!(prompt.contains(category.as_str()));
        }
    }

    #[test]
    fn apply_iteration_demands_complete_replacement() {
        let codex = GameCodex::new(vec![GameElement::new(
            ElementCategory::Story,
            "Act one",
            "The ships stop leaving.",
        )]);
        let request = apply_iteration(&codex, "make it darker");
        let prompt = &request.turns[0].text;
        assert!(prompt.contains("COMPLETE replacement"));
        assert!(prompt.contains("make it darker"));
        assert!(prompt.contains("Act one"));
    }

    #[test]
    fn chat_bounds_element_previews() {
        let context = sample_context();
        let request = chat(&context, &[], "hello", &[]);
        let system = request.system.unwrap();
        // The 300+ char content is cut to the preview length.
        assert!(system.contains("[premise] Hook:"));
        let line = system
            .lines()
            .find(|line| line.contains("[premise]"))
            .unwrap();
        assert!(line.chars().count() < ELEMENT_PREVIEW_CHARS + 40);
        assert!(system.contains("Mira (protagonist): map the unmappable"));
    }

    #[test]
    fn chat_windows_history_to_ten_turns() {
        let history: Vec<ChatMessage> = (0..25)
            .map(|i| ChatMessage::user(format!("m{i}")))
            .collect();
        let request = chat(&ChatContext::default(), &history, "latest", &[]);
        // 10 history turns + the new message.
        assert_eq!(request.turns.len(), HISTORY_WINDOW + 1);
        assert_eq!(request.turns[0].text, "m15");
        assert_eq!(request.turns.last().unwrap().text, "latest");
    }

    #[test]
    fn oversized_context_is_truncated_with_marker() {
        let mut context = ChatContext::default();
        context.notes = serde_json::json!({"dump": "n".repeat(MAX_CONTEXT_JSON_LEN * 2)});
        let request = chat(&context, &[], "hi", &[]);
        let system = request.system.unwrap();
        assert!(system.contains(TRUNCATION_MARKER));
        // The embedded context JSON never exceeds its cap.
        let context_block = system.split("(may be truncated):\n").nth(1).unwrap();
        assert!(context_block.chars().count() <= MAX_CONTEXT_JSON_LEN);
    }

    #[test]
    fn chat_embeds_tool_contract() {
        let registry = lore_tools::builtin_registry();
        let request = chat(&ChatContext::default(), &[], "hi", &registry.list_schemas());
        let system = request.system.unwrap();
        for name in ["add_task", "add_story_note", "add_character", "generate_image"] {
            assert!(system.contains(name));
        }
        assert!(system.contains("toolCalls"));
    }
}
