//! Output formatting

use serde::Serialize;
use serde_json::{Map, Value};

/// Output builder: JSON object on `--json`, a plain message otherwise
pub struct Output {
    json_mode: bool,
    fields: Map<String, Value>,
    message: Option<String>,
}

impl Output {
    /// Create a new output builder
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            fields: Map::new(),
            message: None,
        }
    }

    /// Add a string field
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Add an optional string field, `null` when absent
    pub fn field_opt(mut self, key: &str, value: Option<&str>) -> Self {
        let value = value.map_or(Value::Null, |v| Value::String(v.to_string()));
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Add a boolean field
    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), Value::Bool(value));
        self
    }

    /// Add any serializable value; values that fail to serialize become `null`
    pub fn field_value(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Set the human-readable message
    pub fn message(mut self, msg: &str) -> Self {
        self.message = Some(msg.to_string());
        self
    }

    /// Rendered text, `None` when there is nothing to print
    pub fn render(&self) -> Option<String> {
        if self.json_mode {
            serde_json::to_string_pretty(&self.fields).ok()
        } else {
            self.message.clone()
        }
    }

    /// Print the output
    pub fn print(self) {
        if let Some(text) = self.render() {
            println!("{}", text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_keeps_field_order() {
        let out = Output::new(true)
            .field("b", "x")
            .field_bool("a", true)
            .field_opt("c", None)
            .message("ignored");
        let rendered = out.render().unwrap();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        let keys: Vec<&String> = parsed.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(parsed["c"], Value::Null);
    }

    #[test]
    fn test_text_mode_prints_message() {
        assert_eq!(
            Output::new(false).field("k", "v").message("hello").render(),
            Some("hello".to_string())
        );
        assert_eq!(Output::new(false).field("k", "v").render(), None);
    }
}
