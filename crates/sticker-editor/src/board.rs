//! Sticker board: wires the placement registry, the drag controller and the
//! notifier to the list of stickers currently on the canvas.
//!
//! The host (browser bridge, tests) feeds it palette drops, pointer events
//! and clicks; the board keeps the on-canvas list and the store in step.
//! At rest every on-canvas sticker has exactly one stored record.

use crate::drag::{DragController, DragOutcome, GrabTarget};
use crate::input::InputEvent;
use sticker_core::config::{BoardConfig, MatchPolicy};
use sticker_core::geometry::drop_origin;
use sticker_core::id::StickerId;
use sticker_core::model::{Catalog, PlacementRecord, Surface};
use sticker_core::registry::PlacementRegistry;
use sticker_core::store::StateAdapter;

// ─── Notifier ────────────────────────────────────────────────────────────

/// Fire-and-forget user-facing messages.
pub trait Notifier {
    fn show_notification(&mut self, message: &str);
}

impl<F: FnMut(&str)> Notifier for F {
    fn show_notification(&mut self, message: &str) {
        self(message)
    }
}

/// Notifier that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show_notification(&mut self, message: &str) {
        log::info!("{message}");
    }
}

// ─── On-canvas stickers ──────────────────────────────────────────────────

/// A sticker currently shown on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedSticker {
    pub id: StickerId,
    /// Catalog id of the sticker type.
    pub kind: String,
    pub x: f32,
    pub y: f32,
}

impl PlacedSticker {
    fn from_record(record: &PlacementRecord) -> Self {
        Self {
            id: record.id,
            kind: record.kind.clone(),
            x: record.x,
            y: record.y,
        }
    }
}

/// What a pointer event did to the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoardEvent {
    /// Nothing changed.
    None,
    /// A gesture was armed on a sticker.
    Pressed(StickerId),
    /// A sticker moved on screen during a drag.
    Moved(StickerId),
    /// A drag ended. `persisted` is `false` when no stored record matched.
    Dropped { id: StickerId, persisted: bool },
    /// The press ended without movement; the host should deliver a click.
    Clicked(StickerId),
}

impl BoardEvent {
    /// Whether the canvas needs a re-render.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Moved(_) | Self::Dropped { .. })
    }
}

// ─── Board ───────────────────────────────────────────────────────────────

pub struct StickerBoard<S: StateAdapter> {
    registry: PlacementRegistry<S>,
    drag: DragController,
    stickers: Vec<PlacedSticker>,
    surface: Surface,
    config: BoardConfig,
    notifier: Option<Box<dyn Notifier>>,
}

impl<S: StateAdapter> StickerBoard<S> {
    /// Create a board over `store`. `None` runs the board without persistence.
    pub fn new(catalog: Catalog, store: Option<S>, config: BoardConfig, surface: Surface) -> Self {
        let registry = match store {
            Some(store) => PlacementRegistry::new(catalog, store, &config),
            None => PlacementRegistry::detached(catalog, &config),
        };
        Self {
            registry,
            drag: DragController::new(config.sticker_size, config.click_guard_ms),
            stickers: Vec::new(),
            surface,
            config,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    pub fn set_notifier(&mut self, notifier: Option<Box<dyn Notifier>>) {
        self.notifier = notifier;
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn stickers(&self) -> &[PlacedSticker] {
        &self.stickers
    }

    pub fn sticker(&self, id: StickerId) -> Option<&PlacedSticker> {
        self.stickers.iter().find(|s| s.id == id)
    }

    pub fn registry(&self) -> &PlacementRegistry<S> {
        &self.registry
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Topmost sticker under `(px, py)`; later placements sit on top.
    pub fn hit_test(&self, px: f32, py: f32) -> Option<&PlacedSticker> {
        let footprint = self.config.sticker_size;
        self.stickers
            .iter()
            .rev()
            .find(|s| footprint.contains(s.x, s.y, px, py))
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Rebuild the canvas from the store: one sticker per stored record.
    /// Calling it again replaces, never duplicates.
    pub fn restore(&mut self) -> usize {
        self.stickers = self
            .registry
            .restore()
            .iter()
            .map(PlacedSticker::from_record)
            .collect();
        self.stickers.len()
    }

    /// The canvas changed size; the next drag move is clamped to it.
    pub fn resize(&mut self, surface: Surface) {
        self.surface = surface;
    }

    // ─── Palette drop ────────────────────────────────────────────────────

    /// A palette entry carrying `payload` was dropped with its centre at
    /// `(px, py)`. An empty payload is ignored.
    pub fn handle_drop(&mut self, payload: &str, px: f32, py: f32) -> Option<StickerId> {
        if payload.is_empty() {
            return None;
        }
        let (x, y) = drop_origin(px, py, self.surface, self.config.sticker_size);
        let record = self.registry.place(payload, x, y);
        let sticker = PlacedSticker::from_record(&record);
        let id = sticker.id;
        self.stickers.push(sticker);

        let name = self.registry.catalog().display_name(payload);
        self.notify(&format!("{name} sticker added"));
        Some(id)
    }

    // ─── Pointer gestures ────────────────────────────────────────────────

    pub fn handle_pointer(&mut self, event: &InputEvent) -> BoardEvent {
        let hit = match event {
            InputEvent::PointerDown { x, y, .. } => self.hit_test(*x, *y).map(|s| GrabTarget {
                id: s.id,
                x: s.x,
                y: s.y,
            }),
            _ => None,
        };

        match self.drag.handle(event, hit, self.surface) {
            None => BoardEvent::None,
            Some(DragOutcome::Armed { id }) => BoardEvent::Pressed(id),
            Some(DragOutcome::Moved { id, x, y }) => {
                if let Some(sticker) = self.stickers.iter_mut().find(|s| s.id == id) {
                    sticker.x = x;
                    sticker.y = y;
                }
                BoardEvent::Moved(id)
            }
            Some(DragOutcome::Finished { id, x, y, .. }) => {
                self.notify("Sticker moved");
                let persisted = self.persist_move(id, x, y);
                BoardEvent::Dropped { id, persisted }
            }
            Some(DragOutcome::Click { id }) => BoardEvent::Clicked(id),
        }
    }

    /// A click landed on sticker `id` at time `now`. Fires the sticker's
    /// click action unless the click is the tail of a drag.
    /// Returns whether the action fired.
    pub fn handle_click(&mut self, id: StickerId, now: f64) -> bool {
        if self.drag.suppresses_click(now) {
            return false;
        }
        let Some(kind) = self.sticker(id).map(|s| s.kind.clone()) else {
            return false;
        };
        let name = self.registry.catalog().display_name(&kind);
        self.notify(&format!("{name} sticker clicked"));
        true
    }

    fn persist_move(&mut self, id: StickerId, x: f32, y: f32) -> bool {
        match self.config.match_policy {
            MatchPolicy::ById => self.registry.relocate_by_id(id, x, y),
            MatchPolicy::Proximity => {
                let Some(kind) = self.sticker(id).map(|s| s.kind.clone()) else {
                    return false;
                };
                self.registry.relocate(&kind, x, y)
            }
        }
    }

    fn notify(&mut self, message: &str) {
        if let Some(notifier) = self.notifier.as_mut() {
            notifier.show_notification(message);
        }
    }
}
