//! Sticker data model.
//!
//! - `StickerType` / `Catalog`: the static palette, loaded once at startup.
//! - `PlacementRecord`: one placed sticker, as persisted under the
//!   positions slot of the store.
//! - `Surface` / `Footprint`: canvas and sticker dimensions used for clamping.

use crate::id::StickerId;
use serde::{Deserialize, Serialize};

// ─── Catalog ─────────────────────────────────────────────────────────────

/// A palette entry describing how a kind of sticker looks.
/// Shared by every placed instance of that kind; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerType {
    /// Unique key, stored in `PlacementRecord::kind`.
    pub id: String,
    pub display_name: String,
    /// Icon font name (e.g. `chart-line`).
    pub icon_ref: String,
    pub image_ref: String,
}

impl StickerType {
    pub fn new(id: &str, display_name: &str, icon_ref: &str, image_ref: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            icon_ref: icon_ref.to_string(),
            image_ref: image_ref.to_string(),
        }
    }
}

/// The immutable set of sticker types available in the palette.
///
/// Always holds at least one entry: unknown type ids resolve to the first.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<StickerType>,
}

impl Catalog {
    /// Build a catalog from explicit entries.
    ///
    /// # Errors
    /// Returns an error if `entries` is empty or contains a duplicate id.
    pub fn new(entries: Vec<StickerType>) -> Result<Self, String> {
        if entries.is_empty() {
            return Err("sticker catalog must contain at least one entry".to_string());
        }
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.id == entry.id) {
                return Err(format!("duplicate sticker type id \"{}\"", entry.id));
            }
        }
        Ok(Self { entries })
    }

    /// The six stock stickers shipped with the board.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                StickerType::new(
                    "analytics",
                    "Analytics",
                    "chart-line",
                    "https://cdn-icons-png.flaticon.com/512/2103/2103633.png",
                ),
                StickerType::new(
                    "calendar",
                    "Calendar",
                    "calendar",
                    "https://cdn-icons-png.flaticon.com/512/3652/3652191.png",
                ),
                StickerType::new(
                    "weather",
                    "Weather",
                    "cloud-sun",
                    "https://cdn-icons-png.flaticon.com/512/1146/1146869.png",
                ),
                StickerType::new(
                    "notes",
                    "Notes",
                    "sticky-note",
                    "https://cdn-icons-png.flaticon.com/512/3281/3281289.png",
                ),
                StickerType::new(
                    "tasks",
                    "Tasks",
                    "tasks",
                    "https://cdn-icons-png.flaticon.com/512/2838/2838784.png",
                ),
                StickerType::new(
                    "chart",
                    "Chart",
                    "chart-pie",
                    "https://cdn-icons-png.flaticon.com/512/1170/1170577.png",
                ),
            ],
        }
    }

    pub fn entries(&self) -> &[StickerType] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&StickerType> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The entry used in place of unknown type ids.
    pub fn fallback(&self) -> &StickerType {
        &self.entries[0]
    }

    /// Look up `id`, falling back to the first entry when it is unknown.
    pub fn resolve(&self, id: &str) -> &StickerType {
        match self.get(id) {
            Some(entry) => entry,
            None => {
                log::debug!("unknown sticker type \"{id}\", using \"{}\"", self.fallback().id);
                self.fallback()
            }
        }
    }

    /// Human-readable name for notifications.
    /// Unknown ids are shown with their first letter upper-cased.
    pub fn display_name(&self, id: &str) -> String {
        if let Some(entry) = self.get(id) {
            return entry.display_name.clone();
        }
        let mut chars = id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ─── Placement ───────────────────────────────────────────────────────────

/// One placed sticker as stored in the persistent store.
///
/// Serialized as `{"type": "...", "x": .., "y": .., "id": ".."}`. Stored
/// entries written before stable ids existed are normalized by the
/// registry before they are decoded into a record, so `id` is always set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub id: StickerId,
}

impl PlacementRecord {
    pub fn new(id: StickerId, kind: &str, x: f32, y: f32) -> Self {
        Self {
            kind: kind.to_string(),
            x,
            y,
            id,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

// ─── Geometry types ──────────────────────────────────────────────────────

/// The canvas dimensions, read at gesture time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Width and height a sticker occupies on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f32,
    pub height: f32,
}

impl Default for Footprint {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 50.0,
        }
    }
}

impl Footprint {
    pub fn half(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Whether the point `(px, py)` lies on a sticker whose origin is `(x, y)`.
    pub fn contains(&self, x: f32, y: f32, px: f32, py: f32) -> bool {
        px >= x && px <= x + self.width && py >= y && py <= y + self.height
    }
}
