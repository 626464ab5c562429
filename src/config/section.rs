//! Read-only view into one section of a configuration tree
//!
//! Values are read loosely, the way hand-edited config files are written:
//! formula fields may be strings or bare numbers, and a missing optional
//! field is not an error.

use serde_json::{Map, Value};

use super::error::ConfigError;

#[derive(Debug, Clone)]
pub struct ConfigSection<'a> {
    path: String,
    entries: &'a Map<String, Value>,
}

impl<'a> ConfigSection<'a> {
    /// View the root of a tree. The root must be a map.
    pub fn root(value: &'a Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(entries) => Ok(Self {
                path: String::new(),
                entries,
            }),
            _ => Err(ConfigError::NotASection("<root>".to_string())),
        }
    }

    /// Dotted path of this section from the root
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        let entries = self.entries;
        entries.keys().map(String::as_str)
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Nested section under `key`; missing or non-map values are an error
    pub fn child(&self, key: &str) -> Result<ConfigSection<'a>, ConfigError> {
        self.optional_child(key)?
            .ok_or_else(|| ConfigError::NotASection(self.child_path(key)))
    }

    /// Nested section under `key`, `None` when the key is absent
    pub fn optional_child(&self, key: &str) -> Result<Option<ConfigSection<'a>>, ConfigError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Value::Object(entries)) => Ok(Some(ConfigSection {
                path: self.child_path(key),
                entries,
            })),
            Some(_) => Err(ConfigError::NotASection(self.child_path(key))),
        }
    }

    /// String value; numbers and booleans are converted to their text form
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.entries.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Integer value. Floats are truncated; anything else is an error.
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>, ConfigError> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map(Some)
                .ok_or_else(|| self.invalid(key, "an integer")),
            Some(_) => Err(self.invalid(key, "an integer")),
        }
    }

    /// Boolean value; only real booleans count
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.entries.get(key).and_then(Value::as_bool)
    }

    /// List of strings. Non-list values read as an empty list.
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        match self.entries.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn invalid(&self, key: &str, expected: &'static str) -> ConfigError {
        ConfigError::InvalidField {
            tier: self.path.clone(),
            field: key.to_string(),
            expected,
        }
    }
}
