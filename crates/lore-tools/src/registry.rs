use std::sync::Arc;

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

use lore_core::{StudioState, ToolCall};
use lore_llm::GenerationProvider;

use crate::tools::{AddCharacterTool, AddStoryNoteTool, AddTaskTool, GenerateImageTool};

#[derive(Error, Debug, Clone)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Execution failed: {0}")]
    Execution(String),
}

/// Everything a tool may touch: the shared project state and, for nested
/// image generation, the provider (absent when the service is unconfigured).
#[derive(Clone)]
pub struct ToolContext {
    pub state: Arc<RwLock<StudioState>>,
    pub provider: Option<Arc<dyn GenerationProvider>>,
}

impl ToolContext {
    pub fn new(
        state: Arc<RwLock<StudioState>>,
        provider: Option<Arc<dyn GenerationProvider>>,
    ) -> Self {
        Self { state, provider }
    }
}

/// Prompt-facing description of a tool. Embedded into the chat system
/// prompt so the model knows what it may call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[async_trait]
pub trait StudioTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    async fn execute(&self, call: &ToolCall, ctx: &ToolContext) -> Result<Value, ToolError>;

    fn to_schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

pub type SharedTool = Arc<dyn StudioTool>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tool with name '{0}' already registered")]
    DuplicateTool(String),

    #[error("invalid tool: {0}")]
    InvalidTool(String),
}

pub struct ToolRegistry {
    tools: DashMap<String, SharedTool>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: DashMap::new(),
        }
    }

    pub fn register<T>(&self, tool: T) -> Result<(), RegistryError>
    where
        T: StudioTool + 'static,
    {
        self.register_shared(Arc::new(tool))
    }

    pub fn register_shared(&self, tool: SharedTool) -> Result<(), RegistryError> {
        let name = tool.name().trim();

        if name.is_empty() {
            return Err(RegistryError::InvalidTool(
                "tool name cannot be empty".to_string(),
            ));
        }

        match self.tools.entry(name.to_string()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateTool(name.to_string())),
            Entry::Vacant(entry) => {
                entry.insert(tool);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<SharedTool> {
        self.tools.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self
            .tools
            .iter()
            .map(|entry| entry.value().to_schema())
            .collect();
        schemas.sort_by(|left, right| left.name.cmp(&right.name));
        schemas
    }

    pub fn list_tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// The four tools the assistant may call.
pub fn builtin_registry() -> ToolRegistry {
    let registry = ToolRegistry::new();
    // Registration can only fail on duplicate or empty names, which would
    // be a programming error here.
    let _ = registry.register(AddTaskTool);
    let _ = registry.register(AddStoryNoteTool);
    let _ = registry.register(AddCharacterTool);
    let _ = registry.register(GenerateImageTool);
    registry
}
