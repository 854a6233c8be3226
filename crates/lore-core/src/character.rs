use serde::{Deserialize, Serialize};

use crate::id::generate_id;

/// A character profile. Free-text fields throughout; `image_url` may be
/// filled in later by an image-generation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    #[serde(default = "generate_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub backstory: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub marital_status: String,
    #[serde(default)]
    pub personality_traits: Vec<String>,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub motivations: String,
    #[serde(default)]
    pub fears: String,
    #[serde(default)]
    pub relationships: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            ..Default::default()
        }
    }
}
