//! `localStorage` backend for the placement registry.
//!
//! The whole board state is one JSON object under a single storage entry,
//! mirrored in memory so reads never touch the browser API.

use serde_json::{Map, Value};
use sticker_core::store::StateAdapter;
use web_sys::Storage;

pub struct LocalStorageStore {
    storage: Storage,
    entry: String,
    slots: Map<String, Value>,
}

impl LocalStorageStore {
    /// Open the entry `entry` in the window's `localStorage`.
    ///
    /// Returns `None` when storage is unavailable (private mode, no window),
    /// in which case the board runs without persistence.
    pub fn open(entry: &str) -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        let slots = match storage.get_item(entry).ok().flatten() {
            Some(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(slots)) => slots,
                Ok(_) | Err(_) => {
                    log::warn!("ignoring unreadable localStorage entry \"{entry}\"");
                    Map::new()
                }
            },
            None => Map::new(),
        };
        Some(Self {
            storage,
            entry: entry.to_string(),
            slots,
        })
    }
}

impl StateAdapter for LocalStorageStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), String> {
        self.slots.insert(key.to_string(), value);
        let text = Value::Object(self.slots.clone()).to_string();
        self.storage
            .set_item(&self.entry, &text)
            .map_err(|e| format!("localStorage write failed: {e:?}"))
    }
}
