//! Fixture file model

use crate::error::ConsumeResult;
use crate::format::FixtureFormat;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Contents of a fixture file: case name -> opaque case body, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixtures(Map<String, Value>);

impl Fixtures {
    /// Load a fixture file
    pub fn load(path: &Path) -> ConsumeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let fixtures = serde_json::from_str(&content)?;
        Ok(fixtures)
    }

    /// A file holding exactly one case
    pub fn single(name: impl Into<String>, body: Value) -> Self {
        let mut map = Map::new();
        map.insert(name.into(), body);
        Self(map)
    }

    /// Number of cases
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the file holds no cases
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case names in file order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Body of a named case
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// `(name, body)` pairs in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Format of the file, taken from the first case whose body is recognised
    pub fn detect_format(&self) -> Option<FixtureFormat> {
        self.0.values().find_map(FixtureFormat::detect)
    }

    /// Pretty-printed JSON
    pub fn to_json_pretty(&self) -> ConsumeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
