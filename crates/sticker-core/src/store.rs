//! Persistent store contract and its host-independent backends.
//!
//! The registry never touches storage directly; it goes through the
//! `StateAdapter` trait. Each host supplies its own backend:
//! - tests / headless use: `MemoryStore`
//! - desktop tools: `JsonFileStore`
//! - browser: a `localStorage` adapter in the WASM bridge

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

// ─── Store Trait ─────────────────────────────────────────────────────────

/// Key/value store with array helpers.
///
/// Only `get` and `set` are required; the array operations are provided on
/// top of them and may be overridden by backends with native support.
pub trait StateAdapter {
    /// Read a named slot. An absent key yields `None`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Overwrite a named slot.
    fn set(&mut self, key: &str, value: Value) -> Result<(), String>;

    /// Append `item` to the array stored at `key`, creating it if absent.
    fn add_to_array(&mut self, key: &str, item: Value) -> Result<(), String> {
        let mut items = array_slot(self.get(key), key)?;
        items.push(item);
        self.set(key, Value::Array(items))
    }

    /// Shallow-merge `patch` into the first element satisfying
    /// `predicate(element, index)`. No-op if none match.
    fn update_in_array(
        &mut self,
        key: &str,
        predicate: &dyn Fn(&Value, usize) -> bool,
        patch: Value,
    ) -> Result<(), String> {
        let mut items = array_slot(self.get(key), key)?;
        let Some(pos) = items.iter().enumerate().position(|(i, v)| predicate(v, i)) else {
            return Ok(());
        };
        merge_shallow(&mut items[pos], patch);
        self.set(key, Value::Array(items))
    }
}

fn array_slot(slot: Option<Value>, key: &str) -> Result<Vec<Value>, String> {
    match slot {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(format!(
            "store slot \"{key}\" holds {} instead of an array",
            value_kind(&other)
        )),
    }
}

/// Copy every top-level field of `patch` onto `target`.
/// A non-object target or patch is replaced outright.
fn merge_shallow(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(fields), Value::Object(patch_fields)) => {
            for (k, v) in patch_fields {
                fields.insert(k, v);
            }
        }
        (target, patch) => *target = patch,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ─── Memory Store ────────────────────────────────────────────────────────

/// In-process store; contents are lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Map<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated from a JSON object document.
    pub fn from_json(text: &str) -> Result<Self, String> {
        Ok(Self {
            slots: parse_document(text)?,
        })
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.slots.clone()).to_string()
    }
}

impl StateAdapter for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), String> {
        self.slots.insert(key.to_string(), value);
        Ok(())
    }
}

// ─── JSON File Store ─────────────────────────────────────────────────────

/// Store persisted as a single JSON object on disk.
///
/// Every mutation rewrites the whole file via a sibling temp file and an
/// atomic rename, so a crash never leaves a half-written document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    slots: Map<String, Value>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading it if it exists.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref().to_path_buf();
        let slots = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| format!("Error reading \"{}\": {e}", path.display()))?;
            parse_document(&text).map_err(|e| format!("Error parsing \"{}\": {e}", path.display()))?
        } else {
            Map::new()
        };
        log::debug!("opened store {} ({} slots)", path.display(), slots.len());
        Ok(Self { path, slots })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), String> {
        let text = serde_json::to_string_pretty(&self.slots)
            .map_err(|e| format!("Serialization error: {e}"))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, text)
            .map_err(|e| format!("Error writing \"{}\": {e}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| format!("Error replacing \"{}\": {e}", self.path.display()))
    }
}

impl StateAdapter for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), String> {
        self.slots.insert(key.to_string(), value);
        self.flush()
    }
}

fn parse_document(text: &str) -> Result<Map<String, Value>, String> {
    if text.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(text).map_err(|e| e.to_string())? {
        Value::Object(slots) => Ok(slots),
        other => Err(format!("expected a JSON object, found {}", value_kind(&other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn absent_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("stickerPositions"), None);
    }

    #[test]
    fn add_to_array_creates_slot() {
        let mut store = MemoryStore::new();
        store.add_to_array("list", json!({"a": 1})).unwrap();
        store.add_to_array("list", json!({"a": 2})).unwrap();
        assert_eq!(store.get("list"), Some(json!([{"a": 1}, {"a": 2}])));
    }

    #[test]
    fn add_to_array_rejects_non_array_slot() {
        let mut store = MemoryStore::new();
        store.set("settings", json!({"sidebarOpen": true})).unwrap();
        let err = store.add_to_array("settings", json!(1)).unwrap_err();
        assert!(err.contains("an object"), "unexpected error: {err}");
    }

    #[test]
    fn update_in_array_merges_first_match_only() {
        let mut store = MemoryStore::new();
        store
            .set(
                "list",
                json!([
                    {"type": "notes", "x": 1, "y": 1},
                    {"type": "notes", "x": 2, "y": 2},
                ]),
            )
            .unwrap();
        store
            .update_in_array(
                "list",
                &|item, _| item["type"] == "notes",
                json!({"x": 9}),
            )
            .unwrap();
        assert_eq!(
            store.get("list"),
            Some(json!([
                {"type": "notes", "x": 9, "y": 1},
                {"type": "notes", "x": 2, "y": 2},
            ]))
        );
    }

    #[test]
    fn update_in_array_by_index_and_no_match() {
        let mut store = MemoryStore::new();
        store.set("list", json!([{"v": 0}, {"v": 1}])).unwrap();
        store
            .update_in_array("list", &|_, idx| idx == 1, json!({"v": 5}))
            .unwrap();
        store
            .update_in_array("list", &|_, idx| idx == 7, json!({"v": 6}))
            .unwrap();
        assert_eq!(store.get("list"), Some(json!([{"v": 0}, {"v": 5}])));
    }

    #[test]
    fn memory_store_json_document() {
        let store = MemoryStore::from_json(r#"{"stickerPositions":[]}"#).unwrap();
        assert_eq!(store.get("stickerPositions"), Some(json!([])));
        assert!(MemoryStore::from_json("[1,2]").is_err());
        assert!(MemoryStore::from_json("").unwrap().get("x").is_none());
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store
            .add_to_array("stickerPositions", json!({"type": "tasks", "x": 3, "y": 4}))
            .unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("stickerPositions"),
            Some(json!([{"type": "tasks", "x": 3, "y": 4}]))
        );
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn file_store_rejects_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(err.starts_with("Error parsing"), "unexpected error: {err}");
    }
}
