//! The property bag a host hands to the resolver.
//!
//! Keys are not normalised; the presence of a key signals which strategy the
//! caller intends to use:
//!
//! ```yaml
//! blueprint_file_name: kubernetes.conf
//! # or
//! manager_file_path: ~/.kube/config
//! # or
//! file_content: { apiVersion: v1, kind: Config, clusters: [...] }
//! # or
//! api_options:
//!   host: https://10.0.0.1:6443
//!   verify_ssl: false
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ConnectError, Result};

/// Name of a resource bundled with the blueprint that holds a kubeconfig.
pub const BLUEPRINT_FILE_NAME_KEY: &str = "blueprint_file_name";

/// Path to a kubeconfig already present on the manager host.
pub const MANAGER_FILE_PATH_KEY: &str = "manager_file_path";

/// An inline kubeconfig document.
pub const FILE_CONTENT_KEY: &str = "file_content";

/// Direct API connection options.
pub const API_OPTIONS_KEY: &str = "api_options";

/// Mapping from string keys to arbitrary structured values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigurationBag {
    entries: Map<String, Value>,
}

impl ConfigurationBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON object.
    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    /// Build a bag from any JSON value; only objects are accepted.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            Value::Null => Err(ConnectError::NotAMapping("null")),
            Value::Bool(_) => Err(ConnectError::NotAMapping("a boolean")),
            Value::Number(_) => Err(ConnectError::NotAMapping("a number")),
            Value::String(_) => Err(ConnectError::NotAMapping("a string")),
            Value::Array(_) => Err(ConnectError::NotAMapping("a sequence")),
        }
    }

    /// Parse from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let value: Value =
            serde_yaml::from_str(yaml).map_err(|e| ConnectError::ParseYaml(e.to_string()))?;
        Self::from_value(value)
    }

    /// Insert a value, returning the previous one for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Borrow the underlying mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }
}

impl From<Map<String, Value>> for ConfigurationBag {
    fn from(entries: Map<String, Value>) -> Self {
        Self::from_map(entries)
    }
}

impl fmt::Display for ConfigurationBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.entries).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_bag() {
        let bag = ConfigurationBag::new();
        assert!(bag.is_empty());
        assert_eq!(bag.len(), 0);
        assert_eq!(bag.to_string(), "{}");
    }

    #[test]
    fn test_from_yaml_nested() {
        let yaml = r#"
api_options:
  host: https://10.0.0.1:6443
  verify_ssl: false
"#;
        let bag = ConfigurationBag::from_yaml_str(yaml).unwrap();
        assert!(bag.contains_key(API_OPTIONS_KEY));
        assert_eq!(
            bag.get(API_OPTIONS_KEY).unwrap()["host"],
            json!("https://10.0.0.1:6443")
        );
        assert_eq!(bag.get(API_OPTIONS_KEY).unwrap()["verify_ssl"], json!(false));
    }

    #[test]
    fn test_from_json_rejects_non_mapping() {
        let err = ConfigurationBag::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, ConnectError::NotAMapping("a sequence")));

        let err = ConfigurationBag::from_json_str("not json").unwrap_err();
        assert!(matches!(err, ConnectError::ParseJson(_)));
    }

    #[test]
    fn test_from_yaml_invalid() {
        let err = ConfigurationBag::from_yaml_str("key: [unclosed").unwrap_err();
        assert!(matches!(err, ConnectError::ParseYaml(_)));
    }

    #[test]
    fn test_builder_and_display() {
        let bag = ConfigurationBag::new().with(MANAGER_FILE_PATH_KEY, "~/.kube/config");
        assert_eq!(
            bag.get(MANAGER_FILE_PATH_KEY),
            Some(&json!("~/.kube/config"))
        );
        assert_eq!(bag.to_string(), r#"{"manager_file_path":"~/.kube/config"}"#);
    }

    #[test]
    fn test_insert_replaces() {
        let mut bag = ConfigurationBag::new();
        assert!(bag.insert(BLUEPRINT_FILE_NAME_KEY, "a.conf").is_none());
        let previous = bag.insert(BLUEPRINT_FILE_NAME_KEY, "b.conf");
        assert_eq!(previous, Some(json!("a.conf")));
        assert_eq!(bag.len(), 1);
    }
}
