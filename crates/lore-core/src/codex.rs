use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::generate_id;

/// The five categories a generated element may carry. Anything else coming
/// back from a provider is normalized before it reaches this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementCategory {
    Premise,
    Mechanic,
    Story,
    Visual,
    CharacterArc,
}

impl ElementCategory {
    pub const ALL: [ElementCategory; 5] = [
        ElementCategory::Premise,
        ElementCategory::Mechanic,
        ElementCategory::Story,
        ElementCategory::Visual,
        ElementCategory::CharacterArc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementCategory::Premise => "premise",
            ElementCategory::Mechanic => "mechanic",
            ElementCategory::Story => "story",
            ElementCategory::Visual => "visual",
            ElementCategory::CharacterArc => "character_arc",
        }
    }

    /// Liberal parse used when normalizing provider output. Unknown strings
    /// fall back to `Story` rather than failing the whole element list.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim() {
            "premise" => ElementCategory::Premise,
            "mechanic" => ElementCategory::Mechanic,
            "visual" => ElementCategory::Visual,
            "character_arc" => ElementCategory::CharacterArc,
            _ => ElementCategory::Story,
        }
    }
}

/// A single narrative-design element. Immutable once created; iterations
/// replace the whole list rather than editing in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameElement {
    #[serde(default = "generate_id")]
    pub id: String,
    pub category: ElementCategory,
    pub title: String,
    pub content: String,
}

impl GameElement {
    pub fn new(category: ElementCategory, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            category,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// The canonical narrative-design artifact. `elements` always reflects the
/// last accepted generation response; replacement is all-or-nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCodex {
    pub elements: Vec<GameElement>,
    pub last_updated: DateTime<Utc>,
}

impl Default for GameCodex {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            last_updated: Utc::now(),
        }
    }
}

impl GameCodex {
    pub fn new(elements: Vec<GameElement>) -> Self {
        Self {
            elements,
            last_updated: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// An append-only snapshot of the codex plus the change request that
/// produced it. Revert restores the snapshot wholesale, never a diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameIteration {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub change_description: String,
    pub codex: GameCodex,
}

impl GameIteration {
    pub fn new(change_description: impl Into<String>, codex: GameCodex) -> Self {
        Self {
            id: generate_id(),
            timestamp: Utc::now(),
            change_description: change_description.into(),
            codex,
        }
    }
}
