//! The session configuration document.
//!
//! A [`Config`] is a JSON object addressed by `/`-separated paths, e.g.
//! `mode`, `connect/endpoints`, `scouting/multicast/enabled`. The engine
//! reads whatever paths it understands; unknown paths are preserved. The
//! typed schema and file/environment layering live in `tether-runtime`,
//! which produces a `Config` for [`Session::open`](crate::engine::Session::open).

use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};
use crate::handle::{Resource, self_loaned, self_loaned_mut};

/// A JSON configuration document. Mutable-loan-capable.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    root: Value,
}

impl Config {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    /// Parses a configuration from a JSON document.
    ///
    /// The root must be a JSON object.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let root: Value = serde_json::from_str(json)?;
        if !root.is_object() {
            return Err(ConfigError::NotAnObject);
        }
        Ok(Self { root })
    }

    /// Returns the value at a `/`-separated path, if present.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for segment in path.split('/') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Returns the string at `path`, if present and a string.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_str()
    }

    /// Returns the boolean at `path`, if present and a boolean.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path)?.as_bool()
    }

    /// Parses `json` and stores it at a `/`-separated path, creating
    /// intermediate objects as needed.
    ///
    /// Fails if the path traverses an existing non-object value.
    pub fn insert_json(&mut self, path: &str, json: &str) -> ConfigResult<()> {
        let value: Value = serde_json::from_str(json)?;
        self.insert(path, value)
    }

    /// Stores an already-parsed value at a `/`-separated path.
    pub fn insert(&mut self, path: &str, value: Value) -> ConfigResult<()> {
        let segments: Vec<&str> = path.split('/').collect();
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| ConfigError::InvalidPath(path.to_string()))?;

        let mut current = &mut self.root;
        for segment in parents {
            let map = current
                .as_object_mut()
                .ok_or_else(|| ConfigError::InvalidPath(path.to_string()))?;
            current = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        let map = current
            .as_object_mut()
            .ok_or_else(|| ConfigError::InvalidPath(path.to_string()))?;
        map.insert(last.to_string(), value);
        Ok(())
    }

    /// Serializes the whole document.
    pub fn to_json(&self) -> String {
        self.root.to_string()
    }
}

impl Resource for Config {
    const KIND: &'static str = "config";
}

self_loaned!(Config);
self_loaned_mut!(Config);

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_json())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Config({})", self.to_json())
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        Self::from_json(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Owned;

    #[test]
    fn insert_and_get_nested_paths() {
        let mut config = Config::new();
        config.insert_json("mode", "\"peer\"").unwrap();
        config
            .insert_json("connect/endpoints", "[\"tcp/127.0.0.1:7447\"]")
            .unwrap();
        config
            .insert_json("scouting/multicast/enabled", "true")
            .unwrap();

        assert_eq!(config.get_str("mode"), Some("peer"));
        assert_eq!(config.get_bool("scouting/multicast/enabled"), Some(true));
        assert_eq!(
            config.get("connect/endpoints").unwrap()[0],
            Value::String("tcp/127.0.0.1:7447".into())
        );
        assert!(config.get("scouting/gossip").is_none());
    }

    #[test]
    fn insert_rejects_paths_through_scalars() {
        let mut config = Config::new();
        config.insert_json("mode", "\"peer\"").unwrap();
        let err = config.insert_json("mode/nested", "1").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPath(_)));
    }

    #[test]
    fn from_json_requires_an_object_root() {
        assert!(Config::from_json("{\"mode\": \"client\"}").is_ok());
        assert!(matches!(
            Config::from_json("[1, 2]").unwrap_err(),
            ConfigError::NotAnObject
        ));
        assert!(matches!(
            Config::from_json("not json").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }

    #[test]
    fn mutable_loans_edit_the_document() {
        let mut handle = Owned::new(Config::new());
        handle.loan_mut().insert_json("mode", "\"client\"").unwrap();
        assert_eq!(handle.loan().get_str("mode"), Some("client"));
    }
}
