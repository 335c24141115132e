//! Placement registry: the persisted list of placed stickers.
//!
//! Owns creation (`place`), session replay (`restore`) and position updates
//! (`relocate`, `relocate_by_id`) against a `StateAdapter`. Nothing here
//! fails hard: store errors are logged and the registry degrades to a no-op,
//! keeping the canvas responsive at the cost of persistence.

use crate::config::BoardConfig;
use crate::geometry::within_tolerance;
use crate::id::StickerId;
use crate::model::{Catalog, PlacementRecord};
use crate::store::StateAdapter;
use serde_json::{Map, Value, json};
use std::collections::HashSet;

pub struct PlacementRegistry<S: StateAdapter> {
    catalog: Catalog,
    /// `None` when no store is wired up; placement then only lives in memory.
    store: Option<S>,
    key: String,
    tolerance: f32,
}

impl<S: StateAdapter> PlacementRegistry<S> {
    /// Wrap `store`, normalizing its positions slot right away so that every
    /// id already stored is reserved before `place` can hand out a new one.
    pub fn new(catalog: Catalog, store: S, config: &BoardConfig) -> Self {
        let mut registry = Self {
            catalog,
            store: Some(store),
            key: config.positions_key.clone(),
            tolerance: config.match_tolerance,
        };
        registry.normalize();
        registry
    }

    /// A registry without a backing store. `restore` yields nothing and
    /// nothing is persisted.
    pub fn detached(catalog: Catalog, config: &BoardConfig) -> Self {
        log::debug!("placement registry running without a store");
        Self {
            catalog,
            store: None,
            key: config.positions_key.clone(),
            tolerance: config.match_tolerance,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    pub fn is_detached(&self) -> bool {
        self.store.is_none()
    }

    /// Current stored records, in store order.
    pub fn records(&self) -> Vec<PlacementRecord> {
        self.raw_entries()
            .iter()
            .filter_map(decode_record)
            .collect()
    }

    /// Read the stored records, in insertion order, one per stored entry.
    /// Never appends.
    pub fn restore(&mut self) -> Vec<PlacementRecord> {
        let records = self.normalize();
        log::info!("restored {} stickers", records.len());
        records
    }

    /// Bring the positions slot into the shape every record needs:
    ///
    /// - every id already stored is interned first, so ids generated below
    ///   (or by a later `place`) never collide with one;
    /// - entries missing an id, or repeating an earlier entry's id, get a
    ///   fresh one;
    /// - an entry with an unusable `type` takes the catalog fallback, and a
    ///   non-numeric coordinate becomes 0;
    /// - entries that are not objects cannot be shown and are removed.
    ///
    /// The slot is written back only if something changed.
    fn normalize(&mut self) -> Vec<PlacementRecord> {
        let Some(store) = self.store.as_mut() else {
            return Vec::new();
        };
        let entries = match store.get(&self.key) {
            Some(Value::Array(entries)) => entries,
            Some(Value::Null) | None => return Vec::new(),
            Some(_) => {
                log::warn!("store slot \"{}\" is not an array; nothing restored", self.key);
                return Vec::new();
            }
        };

        for entry in &entries {
            if let Some(id) = entry.get("id").and_then(Value::as_str) {
                StickerId::intern(id);
            }
        }

        let fallback = self.catalog.fallback().id.as_str();
        let mut seen = HashSet::new();
        let mut changed = false;
        let mut kept = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut fields = match entry {
                Value::Object(fields) => fields,
                other => {
                    log::warn!("removing stored placement that is not an object: {other}");
                    changed = true;
                    continue;
                }
            };
            changed |= repair_fields(&mut fields, fallback);

            let stored_id = fields.get("id").and_then(Value::as_str).map(StickerId::intern);
            if !stored_id.is_some_and(|id| seen.insert(id)) {
                let id = StickerId::generate();
                seen.insert(id);
                fields.insert("id".to_string(), json!(id.as_str()));
                changed = true;
            }
            kept.push(Value::Object(fields));
        }

        if changed {
            log::debug!("rewrote placement slot \"{}\" ({} entries)", self.key, kept.len());
            if let Err(e) = store.set(&self.key, Value::Array(kept.clone())) {
                log::warn!("could not write back normalized placements: {e}");
            }
        }
        kept.iter().filter_map(decode_record).collect()
    }

    /// Record a new sticker at `(x, y)`.
    ///
    /// Unknown types are replaced by the catalog's first entry. Exactly one
    /// append is made to the store; the caller is responsible for having
    /// clamped the coordinates.
    pub fn place(&mut self, kind: &str, x: f32, y: f32) -> PlacementRecord {
        let kind = self.catalog.resolve(kind).id.clone();
        let record = PlacementRecord::new(StickerId::generate(), &kind, x, y);

        if let Some(store) = self.store.as_mut() {
            match serde_json::to_value(&record) {
                Ok(item) => {
                    if let Err(e) = store.add_to_array(&self.key, item) {
                        log::warn!("could not persist {kind} sticker: {e}");
                    } else {
                        log::debug!("placed {kind} at ({x}, {y})");
                    }
                }
                Err(e) => log::warn!("could not encode {kind} sticker: {e}"),
            }
        }
        record
    }

    /// Move the first stored record of `kind` lying within the tolerance
    /// window of `(new_x, new_y)` to that position.
    ///
    /// Returns `false` (and leaves the store untouched) when nothing matches.
    /// When two same-type stickers are both in range, the earlier one wins.
    pub fn relocate(&mut self, kind: &str, new_x: f32, new_y: f32) -> bool {
        let tolerance = self.tolerance;
        let index = self.raw_entries().iter().position(|entry| {
            decode_record(entry).is_some_and(|r| {
                r.kind == kind && within_tolerance(r.x, r.y, new_x, new_y, tolerance)
            })
        });
        match index {
            Some(index) => self.patch_position(&|_, idx| idx == index, new_x, new_y),
            None => {
                log::warn!("no stored {kind} sticker near ({new_x}, {new_y}); move not saved");
                false
            }
        }
    }

    /// Move the record with stable id `id` to `(x, y)`.
    pub fn relocate_by_id(&mut self, id: StickerId, x: f32, y: f32) -> bool {
        let found = self
            .raw_entries()
            .iter()
            .any(|entry| entry_has_id(entry, id));
        if !found {
            log::warn!("no stored sticker {id}; move not saved");
            return false;
        }
        self.patch_position(&|entry, _| entry_has_id(entry, id), x, y)
    }

    fn patch_position(
        &mut self,
        predicate: &dyn Fn(&Value, usize) -> bool,
        x: f32,
        y: f32,
    ) -> bool {
        let Some(store) = self.store.as_mut() else {
            return false;
        };
        match store.update_in_array(&self.key, predicate, json!({ "x": x, "y": y })) {
            Ok(()) => {
                log::debug!("relocated sticker to ({x}, {y})");
                true
            }
            Err(e) => {
                log::warn!("could not persist sticker move: {e}");
                false
            }
        }
    }

    fn raw_entries(&self) -> Vec<Value> {
        match self.store.as_ref().and_then(|s| s.get(&self.key)) {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        }
    }
}

/// Fill in `type`, `x` and `y` where they are missing or of the wrong kind.
/// Returns whether anything was changed.
fn repair_fields(fields: &mut Map<String, Value>, fallback_kind: &str) -> bool {
    let mut changed = false;
    if !fields.get("type").is_some_and(Value::is_string) {
        log::warn!("stored placement has no usable type; using \"{fallback_kind}\"");
        fields.insert("type".to_string(), json!(fallback_kind));
        changed = true;
    }
    for axis in ["x", "y"] {
        if !fields.get(axis).is_some_and(Value::is_number) {
            log::warn!("stored placement has no usable {axis}; using 0");
            fields.insert(axis.to_string(), json!(0.0));
            changed = true;
        }
    }
    changed
}

fn decode_record(entry: &Value) -> Option<PlacementRecord> {
    match serde_json::from_value(entry.clone()) {
        Ok(record) => Some(record),
        Err(e) => {
            log::warn!("skipping malformed placement record {entry}: {e}");
            None
        }
    }
}

fn entry_has_id(entry: &Value, id: StickerId) -> bool {
    entry.get("id").and_then(Value::as_str) == Some(id.as_str())
}
