use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Every sticker id seen by this process: loaded from the store or generated.
/// Generation consults it so a new sticker never takes a stored sticker's id.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Identity of one placed sticker, persisted as the record's `id` field.
///
/// Two stickers of the same type at the same spot still have different ids;
/// a finished drag is written back to the record carrying this id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StickerId(Spur);

impl StickerId {
    /// The id stored as `s`. Interning a stored id also reserves it.
    pub fn intern(s: &str) -> Self {
        StickerId(INTERNER.get_or_intern(s))
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Id for a sticker dropped from the palette or restored without one
    /// (`sticker_0`, `sticker_1`, ...).
    ///
    /// Ids must be reserved with `intern` before this runs, or a stored
    /// sticker's id may be handed out again.
    pub fn generate() -> Self {
        Self::with_prefix("sticker")
    }

    /// Next unreserved `{prefix}_{n}`.
    pub fn with_prefix(prefix: &str) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static NEXT: AtomicU64 = AtomicU64::new(0);
        loop {
            let n = NEXT.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("{prefix}_{n}");
            if INTERNER.get(&candidate).is_none() {
                return Self::intern(&candidate);
            }
        }
    }
}

impl fmt::Debug for StickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for StickerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StickerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StickerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(StickerId::intern(&s))
    }
}
