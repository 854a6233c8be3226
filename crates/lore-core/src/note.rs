use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::generate_id;

/// A free-standing story note, independent of every other entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryNote {
    #[serde(default = "generate_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl StoryNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            content: content.into(),
            tags,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTarget {
    Codex,
    Character,
    Task,
    General,
}

/// Feedback attached to another entity by id. The reference is weak:
/// deleting the target leaves the note dangling, and display code resolves
/// the title with a fallback instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackNote {
    #[serde(default = "generate_id")]
    pub id: String,
    pub target_id: String,
    pub target_type: FeedbackTarget,
    pub target_title: String,
    pub content: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl FeedbackNote {
    pub fn new(
        target_id: impl Into<String>,
        target_type: FeedbackTarget,
        target_title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_id(),
            target_id: target_id.into(),
            target_type,
            target_title: target_title.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}
