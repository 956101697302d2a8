//! Persistence adapters for world properties.
//!
//! The adapter is deliberately untyped: it stores whatever [StoreValue] it is handed under a
//! flat, un-namespaced key space. Type enforcement lives in the registry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sled::IVec;

use crate::store::errors::StoreError;
use crate::store::value::StoreValue;

const TREE_PROPERTIES: &str = "world_properties";
const MAX_NAME_LEN: usize = 128;

/// Key/value API of the enclosing world.
///
/// `get` returns `Ok(None)` for a name that was never written. Invalid names and backend
/// failures surface as errors.
pub trait PropertyAdapter {
    fn get(&self, name: &str) -> Result<Option<StoreValue>, StoreError>;
    fn set(&self, name: &str, value: &StoreValue) -> Result<(), StoreError>;
    /// Remove every property, registered or not. Irreversible.
    fn clear_all(&self) -> Result<(), StoreError>;
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty()
        || name.len() > MAX_NAME_LEN
        || name.chars().any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Helper builder so tests can easily create throwaway property stores with custom paths.
pub struct SledPropertiesBuilder {
    path: PathBuf,
    tree: String,
}

impl SledPropertiesBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tree: TREE_PROPERTIES.to_string(),
        }
    }

    /// Use a different tree inside the same database (several worlds in one file).
    pub fn with_tree(mut self, tree: &str) -> Self {
        self.tree = tree.to_string();
        self
    }

    pub fn open(self) -> Result<SledProperties, StoreError> {
        SledProperties::open_with_tree(self.path, &self.tree)
    }
}

/// Sled-backed world properties. Values are bincode-encoded [StoreValue]s.
pub struct SledProperties {
    _db: sled::Db,
    properties: sled::Tree,
}

impl SledProperties {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::open_with_tree(path, TREE_PROPERTIES)
    }

    fn open_with_tree<P: AsRef<Path>>(path: P, tree: &str) -> Result<Self, StoreError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let properties = db.open_tree(tree)?;
        Ok(Self {
            _db: db,
            properties,
        })
    }

    fn deserialize(bytes: IVec) -> Result<StoreValue, StoreError> {
        Ok(bincode::deserialize::<StoreValue>(&bytes)?)
    }

    /// Number of persisted properties, registered or not.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl PropertyAdapter for SledProperties {
    fn get(&self, name: &str) -> Result<Option<StoreValue>, StoreError> {
        validate_name(name)?;
        let Some(bytes) = self.properties.get(name.as_bytes())? else {
            return Ok(None);
        };
        Ok(Some(Self::deserialize(bytes)?))
    }

    fn set(&self, name: &str, value: &StoreValue) -> Result<(), StoreError> {
        validate_name(name)?;
        let bytes = bincode::serialize(value)?;
        self.properties.insert(name.as_bytes(), bytes)?;
        self.properties.flush()?;
        Ok(())
    }

    fn clear_all(&self) -> Result<(), StoreError> {
        self.properties.clear()?;
        self.properties.flush()?;
        Ok(())
    }
}

/// Volatile adapter for demos and tests.
#[derive(Default)]
pub struct MemoryProperties {
    values: Mutex<HashMap<String, StoreValue>>,
}

impl MemoryProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> StoreError {
        StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "memory properties lock poisoned",
        ))
    }
}

impl PropertyAdapter for MemoryProperties {
    fn get(&self, name: &str) -> Result<Option<StoreValue>, StoreError> {
        validate_name(name)?;
        let values = self.values.lock().map_err(|_| Self::poisoned())?;
        Ok(values.get(name).cloned())
    }

    fn set(&self, name: &str, value: &StoreValue) -> Result<(), StoreError> {
        validate_name(name)?;
        let mut values = self.values.lock().map_err(|_| Self::poisoned())?;
        values.insert(name.to_string(), value.clone());
        Ok(())
    }

    fn clear_all(&self) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| Self::poisoned())?;
        values.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sled_round_trip_and_persistence() {
        let dir = TempDir::new().expect("tempdir");
        {
            let props = SledPropertiesBuilder::new(dir.path()).open().expect("open");
            assert_eq!(props.get("level").expect("get"), None);
            props.set("level", &StoreValue::Number(3.0)).expect("set");
            props.set("name", &StoreValue::from("")).expect("set");
        }
        let props = SledProperties::open(dir.path()).expect("reopen");
        assert_eq!(props.get("level").expect("get"), Some(StoreValue::Number(3.0)));
        assert_eq!(props.get("name").expect("get"), Some(StoreValue::from("")));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn clear_all_removes_unregistered_keys_too() {
        let dir = TempDir::new().expect("tempdir");
        let props = SledPropertiesBuilder::new(dir.path()).open().expect("open");
        props.set("a", &StoreValue::Boolean(true)).expect("set");
        props.set("b", &StoreValue::Number(1.0)).expect("set");
        props.clear_all().expect("clear");
        assert!(props.is_empty());
        assert_eq!(props.get("a").expect("get"), None);
    }

    #[test]
    fn invalid_names_are_errors() {
        let props = MemoryProperties::new();
        assert!(matches!(props.get(""), Err(StoreError::InvalidName(_))));
        assert!(matches!(
            props.get("two words"),
            Err(StoreError::InvalidName(name)) if name == "two words"
        ));
        assert!(matches!(
            props.set("bad\nname", &StoreValue::Boolean(true)),
            Err(StoreError::InvalidName(_))
        ));
        assert!(matches!(
            props.set(&"x".repeat(MAX_NAME_LEN + 1), &StoreValue::Number(1.0)),
            Err(StoreError::InvalidName(_))
        ));
        assert!(props.is_empty());
    }

    #[test]
    fn separate_trees_do_not_share_keys() {
        let dir = TempDir::new().expect("tempdir");
        {
            let other = SledPropertiesBuilder::new(dir.path())
                .with_tree("other_world")
                .open()
                .expect("open other");
            other.set("level", &StoreValue::Number(2.0)).expect("set");
        }
        let default = SledPropertiesBuilder::new(dir.path()).open().expect("open default");
        assert_eq!(default.get("level").expect("get"), None);
    }
}
