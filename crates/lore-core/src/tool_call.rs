use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A backend-proposed, client-executed state mutation. Transient: never
/// persisted, only carried from a chat response into the tool loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// String argument, trimmed; `None` when absent, non-string, or blank.
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.args
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// String-list argument. Accepts an array of strings or a single
    /// comma-separated string, since models emit both shapes.
    pub fn str_list_arg(&self, key: &str) -> Vec<String> {
        match self.args.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
            Some(Value::String(joined)) => joined
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(args: Value) -> ToolCall {
        ToolCall::new("add_task", args.as_object().cloned().unwrap_or_default())
    }

    #[test]
    fn str_arg_trims_and_rejects_blank() {
        let call = call(json!({"title": "  Write intro  ", "note": "   "}));
        assert_eq!(call.str_arg("title"), Some("Write intro"));
        assert_eq!(call.str_arg("note"), None);
        assert_eq!(call.str_arg("missing"), None);
    }

    #[test]
    fn str_list_accepts_array_or_comma_string() {
        let call = call(json!({"tags": ["lore", " world "], "traits": "brave, stoic"}));
        assert_eq!(call.str_list_arg("tags"), vec!["lore", "world"]);
        assert_eq!(call.str_list_arg("traits"), vec!["brave", "stoic"]);
        assert!(call.str_list_arg("missing").is_empty());
    }
}
