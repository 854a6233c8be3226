use serde::{Deserialize, Serialize};

/// The free-text seed document a codex is synthesized from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBrief {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub art_style: String,
    #[serde(default)]
    pub world_setting: String,
    #[serde(default)]
    pub mechanics: String,
    #[serde(default)]
    pub key_characters: String,
}

impl ProjectBrief {
    /// Named sub-fields in prompt order, paired with their display labels.
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("Title", &self.title),
            ("Genre", &self.genre),
            ("Art style", &self.art_style),
            ("World setting", &self.world_setting),
            ("Mechanics", &self.mechanics),
            ("Key characters", &self.key_characters),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.trim().is_empty())
    }
}
