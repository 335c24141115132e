//! Board configuration.

use crate::model::Footprint;
use serde::{Deserialize, Serialize};

/// How a finished drag finds the stored record it should update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchPolicy {
    /// Direct lookup by the sticker's stable id.
    #[default]
    ById,
    /// First record of the same type within `match_tolerance` of the new
    /// position. Kept for boards whose data predates stable ids.
    Proximity,
}

/// Configuration for a sticker board.
///
/// Every field has a default, so a partial (or empty) JSON object is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Size of every placed sticker. Default: **50×50**.
    pub sticker_size: Footprint,

    /// Per-axis window used by proximity matching (strict `<`). Default: **50**.
    pub match_tolerance: f32,

    /// How long clicks stay suppressed after a drag ends, in ms. Default: **100**.
    pub click_guard_ms: f64,

    /// Store slot holding the placement records. Default: `"stickerPositions"`.
    pub positions_key: String,

    pub match_policy: MatchPolicy,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            sticker_size: Footprint::default(),
            match_tolerance: 50.0,
            click_guard_ms: 100.0,
            positions_key: "stickerPositions".to_string(),
            match_policy: MatchPolicy::ById,
        }
    }
}

impl BoardConfig {
    /// Parse a config from JSON; missing fields take their defaults.
    ///
    /// # Errors
    /// Returns the deserializer message for malformed JSON, and rejects
    /// non-positive sizes or tolerances.
    pub fn from_json(text: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| format!("Invalid board config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sticker_size.width <= 0.0 || self.sticker_size.height <= 0.0 {
            return Err("stickerSize must be positive".to_string());
        }
        if self.match_tolerance <= 0.0 {
            return Err("matchTolerance must be positive".to_string());
        }
        if self.click_guard_ms < 0.0 {
            return Err("clickGuardMs must not be negative".to_string());
        }
        if self.positions_key.is_empty() {
            return Err("positionsKey must not be empty".to_string());
        }
        Ok(())
    }
}
