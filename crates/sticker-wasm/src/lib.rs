//! WASM bridge for the sticker board: exposes the Rust board to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page keeps rendering the
//! DOM (palette, sticker elements, notification banner); every decision about
//! where a sticker is and what gets persisted goes through `StickerCanvas`.

mod storage;

use serde_json::json;
use sticker_core::config::BoardConfig;
use sticker_core::id::StickerId;
use sticker_core::model::{Catalog, Surface};
use sticker_editor::board::{BoardEvent, Notifier, StickerBoard};
use sticker_editor::input::{InputEvent, PointerButton};
use storage::LocalStorageStore;
use wasm_bindgen::prelude::*;

/// localStorage entry holding the board state.
const STORAGE_ENTRY: &str = "stickerBoardState";

/// The JavaScript-facing board controller.
#[wasm_bindgen]
pub struct StickerCanvas {
    board: StickerBoard<LocalStorageStore>,
}

#[wasm_bindgen]
impl StickerCanvas {
    /// Create a board for a canvas of `width` × `height` pixels.
    ///
    /// `config_json` may be empty for defaults. Throws if it is malformed.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, config_json: &str) -> Result<StickerCanvas, JsValue> {
        console_error_panic_hook_setup();
        init_console_logging();

        let config = if config_json.trim().is_empty() {
            BoardConfig::default()
        } else {
            BoardConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e))?
        };
        let store = LocalStorageStore::open(STORAGE_ENTRY);
        let surface = Surface { width, height };
        Ok(Self {
            board: StickerBoard::new(Catalog::builtin(), store, config, surface),
        })
    }

    /// Route notifications to `callback(message)`.
    pub fn set_notifier(&mut self, callback: js_sys::Function) {
        self.board
            .set_notifier(Some(Box::new(JsNotifier { callback })));
    }

    /// Rebuild the canvas from storage. Returns the sticker count.
    pub fn restore(&mut self) -> u32 {
        self.board.restore() as u32
    }

    /// The canvas element changed size.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.board.resize(Surface { width, height });
    }

    /// A palette entry was dropped with its centre at `(x, y)`.
    /// Returns the new sticker's id, or an empty string if ignored.
    pub fn handle_drop(&mut self, payload: &str, x: f32, y: f32) -> String {
        self.board
            .handle_drop(payload, x, y)
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Returns JSON: `{"changed":bool,"event":"<kind>","id":"<sticker>"}`.
    pub fn handle_pointer_down(&mut self, x: f32, y: f32, button: i16, time_ms: f64) -> String {
        let event = InputEvent::from_pointer_down(x, y, PointerButton::from_index(button), time_ms);
        event_json(self.board.handle_pointer(&event))
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32, time_ms: f64) -> String {
        event_json(
            self.board
                .handle_pointer(&InputEvent::from_pointer_move(x, y, time_ms)),
        )
    }

    pub fn handle_pointer_up(&mut self, x: f32, y: f32, time_ms: f64) -> String {
        event_json(
            self.board
                .handle_pointer(&InputEvent::from_pointer_up(x, y, time_ms)),
        )
    }

    /// A click landed on sticker `id`. Returns `true` if its action ran.
    pub fn handle_click(&mut self, id: &str, time_ms: f64) -> bool {
        self.board.handle_click(StickerId::intern(id), time_ms)
    }

    pub fn is_dragging(&self) -> bool {
        self.board.drag().is_dragging()
    }

    /// On-canvas stickers as JSON: `[{"id","type","x","y","image","icon"}]`.
    pub fn stickers_json(&self) -> String {
        let catalog = self.board.registry().catalog();
        let list: Vec<serde_json::Value> = self
            .board
            .stickers()
            .iter()
            .map(|s| {
                let look = catalog.resolve(&s.kind);
                json!({
                    "id": s.id.as_str(),
                    "type": s.kind,
                    "x": s.x,
                    "y": s.y,
                    "image": look.image_ref,
                    "icon": look.icon_ref,
                    "name": look.display_name,
                })
            })
            .collect();
        serde_json::Value::Array(list).to_string()
    }
}

/// The palette entries as JSON, for populating the sticker tray.
#[wasm_bindgen]
pub fn catalog_json() -> String {
    serde_json::to_string(Catalog::builtin().entries()).unwrap_or_else(|_| "[]".to_string())
}

fn event_json(event: BoardEvent) -> String {
    let (kind, id, persisted) = match event {
        BoardEvent::None => ("none", None, None),
        BoardEvent::Pressed(id) => ("pressed", Some(id), None),
        BoardEvent::Moved(id) => ("moved", Some(id), None),
        BoardEvent::Dropped { id, persisted } => ("dropped", Some(id), Some(persisted)),
        BoardEvent::Clicked(id) => ("clicked", Some(id), None),
    };
    let mut out = json!({
        "changed": event.changed(),
        "event": kind,
        "id": id.map(|id| id.as_str().to_string()).unwrap_or_default(),
    });
    if let Some(persisted) = persisted {
        out["persisted"] = json!(persisted);
    }
    out.to_string()
}

// ─── JS notifier ─────────────────────────────────────────────────────────

struct JsNotifier {
    callback: js_sys::Function,
}

impl Notifier for JsNotifier {
    fn show_notification(&mut self, message: &str) {
        if let Err(e) = self
            .callback
            .call1(&JsValue::NULL, &JsValue::from_str(message))
        {
            log::warn!("notification callback threw: {e:?}");
        }
    }
}

// ─── Console logging ─────────────────────────────────────────────────────

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    #[cfg(target_arch = "wasm32")]
    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}", record.target(), record.args());
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line.into()),
            log::Level::Warn => web_sys::console::warn_1(&line.into()),
            _ => web_sys::console::log_1(&line.into()),
        }
    }

    /// No console outside the browser.
    #[cfg(not(target_arch = "wasm32"))]
    fn log(&self, _record: &log::Record) {}

    fn flush(&self) {}
}

static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

fn init_console_logging() {
    if log::set_logger(&CONSOLE_LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Sticker board panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
