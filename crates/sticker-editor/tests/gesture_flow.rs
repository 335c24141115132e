//! Integration tests: board gestures end to end (sticker-editor ↔ sticker-core).
//!
//! Drives a `StickerBoard` with pointer streams and checks both the
//! on-canvas positions and what ends up in the store.

use pretty_assertions::assert_eq;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use sticker_core::*;
use sticker_editor::board::{BoardEvent, StickerBoard};
use sticker_editor::input::{InputEvent, PointerButton};

const SURFACE: Surface = Surface {
    width: 800.0,
    height: 600.0,
};

type Messages = Rc<RefCell<Vec<String>>>;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn make_board(config: BoardConfig) -> (StickerBoard<MemoryStore>, Messages) {
    init_logging();
    let messages: Messages = Rc::default();
    let sink = Rc::clone(&messages);
    let board = StickerBoard::new(Catalog::builtin(), Some(MemoryStore::new()), config, SURFACE)
        .with_notifier(move |m: &str| sink.borrow_mut().push(m.to_string()));
    (board, messages)
}

fn stored(board: &StickerBoard<MemoryStore>) -> Vec<(String, f32, f32)> {
    board
        .registry()
        .records()
        .into_iter()
        .map(|r| (r.kind, r.x, r.y))
        .collect()
}

fn down(x: f32, y: f32, t: f64) -> InputEvent {
    InputEvent::from_pointer_down(x, y, PointerButton::Primary, t)
}

// ─── Drag ───────────────────────────────────────────────────────────────

#[test]
fn drag_moves_sticker_and_persists() {
    let (mut board, messages) = make_board(BoardConfig::default());
    let id = board.handle_drop("calendar", 225.0, 225.0).unwrap();

    assert_eq!(board.handle_pointer(&down(210.0, 210.0, 0.0)), BoardEvent::Pressed(id));
    assert_eq!(
        board.handle_pointer(&InputEvent::from_pointer_move(300.0, 260.0, 16.0)),
        BoardEvent::Moved(id)
    );
    assert_eq!(
        board.handle_pointer(&InputEvent::from_pointer_up(300.0, 260.0, 32.0)),
        BoardEvent::Dropped {
            id,
            persisted: true
        }
    );

    let s = board.sticker(id).unwrap();
    assert_eq!((s.x, s.y), (290.0, 250.0));
    assert_eq!(stored(&board), vec![("calendar".to_string(), 290.0, 250.0)]);
    assert_eq!(
        *messages.borrow(),
        vec!["Calendar sticker added".to_string(), "Sticker moved".to_string()]
    );
}

#[test]
fn drag_past_edge_is_clamped() {
    let (mut board, _) = make_board(BoardConfig::default());
    let id = board.handle_drop("weather", 100.0, 100.0).unwrap();

    board.handle_pointer(&down(100.0, 100.0, 0.0));
    board.handle_pointer(&InputEvent::from_pointer_move(2000.0, 1500.0, 10.0));
    board.handle_pointer(&InputEvent::from_pointer_move(-500.0, 2000.0, 20.0));
    board.handle_pointer(&InputEvent::from_pointer_up(-500.0, 2000.0, 30.0));

    let s = board.sticker(id).unwrap();
    assert_eq!((s.x, s.y), (0.0, 550.0));
    assert_eq!(stored(&board), vec![("weather".to_string(), 0.0, 550.0)]);
}

#[test]
fn resize_between_gestures_changes_bounds() {
    let (mut board, _) = make_board(BoardConfig::default());
    let id = board.handle_drop("notes", 100.0, 100.0).unwrap();
    board.resize(Surface {
        width: 400.0,
        height: 300.0,
    });

    board.handle_pointer(&down(100.0, 100.0, 0.0));
    board.handle_pointer(&InputEvent::from_pointer_move(1000.0, 1000.0, 10.0));
    board.handle_pointer(&InputEvent::from_pointer_up(1000.0, 1000.0, 20.0));

    let s = board.sticker(id).unwrap();
    assert_eq!((s.x, s.y), (350.0, 250.0));
}

// ─── Click vs drag ──────────────────────────────────────────────────────

#[test]
fn press_release_is_click_not_move() {
    let (mut board, messages) = make_board(BoardConfig::default());
    let id = board.handle_drop("tasks", 125.0, 125.0).unwrap();
    let before = board.registry().store().unwrap().to_json();

    board.handle_pointer(&down(120.0, 120.0, 0.0));
    assert_eq!(
        board.handle_pointer(&InputEvent::from_pointer_up(120.0, 120.0, 80.0)),
        BoardEvent::Clicked(id)
    );
    assert_eq!(board.registry().store().unwrap().to_json(), before);

    assert!(board.handle_click(id, 81.0));
    assert_eq!(
        messages.borrow().last().map(String::as_str),
        Some("Tasks sticker clicked")
    );
}

#[test]
fn click_right_after_drag_is_suppressed() {
    let (mut board, messages) = make_board(BoardConfig::default());
    let id = board.handle_drop("chart", 125.0, 125.0).unwrap();

    board.handle_pointer(&down(120.0, 120.0, 0.0));
    board.handle_pointer(&InputEvent::from_pointer_move(150.0, 150.0, 10.0));
    board.handle_pointer(&InputEvent::from_pointer_up(150.0, 150.0, 20.0));

    assert!(!board.handle_click(id, 21.0));
    assert!(!messages.borrow().iter().any(|m| m.ends_with("clicked")));

    // Once the guard window has passed, clicks work again.
    assert!(board.handle_click(id, 500.0));
}

// ─── Restore ────────────────────────────────────────────────────────────

#[test]
fn restore_is_idempotent() {
    let (mut board, _) = make_board(BoardConfig::default());
    board.handle_drop("notes", 100.0, 100.0);
    board.handle_drop("tasks", 300.0, 300.0);

    assert_eq!(board.restore(), 2);
    assert_eq!(board.restore(), 2);
    assert_eq!(board.stickers().len(), 2);
    assert_eq!(board.registry().records().len(), 2);
}

#[test]
fn restored_legacy_stickers_can_be_dragged() {
    init_logging();
    let store = MemoryStore::from_json(
        r#"{"stickerPositions":[{"type":"notes","x":100,"y":100},{"type":"notes","x":120,"y":100}]}"#,
    )
    .unwrap();
    let mut board =
        StickerBoard::new(Catalog::builtin(), Some(store), BoardConfig::default(), SURFACE);
    assert_eq!(board.restore(), 2);

    // Grab the second (topmost) sticker and move it far away.
    board.handle_pointer(&down(165.0, 110.0, 0.0));
    board.handle_pointer(&InputEvent::from_pointer_move(565.0, 410.0, 10.0));
    let event = board.handle_pointer(&InputEvent::from_pointer_up(565.0, 410.0, 20.0));
    assert!(matches!(event, BoardEvent::Dropped { persisted: true, .. }));

    assert_eq!(
        stored(&board),
        vec![
            ("notes".to_string(), 100.0, 100.0),
            ("notes".to_string(), 520.0, 400.0),
        ]
    );
}

// ─── Proximity matching ─────────────────────────────────────────────────

#[test]
fn proximity_policy_small_move_persists() {
    let config = BoardConfig {
        match_policy: MatchPolicy::Proximity,
        ..BoardConfig::default()
    };
    let (mut board, _) = make_board(config);
    let id = board.handle_drop("calendar", 225.0, 225.0).unwrap();

    board.handle_pointer(&down(210.0, 210.0, 0.0));
    board.handle_pointer(&InputEvent::from_pointer_move(240.0, 220.0, 10.0));
    let event = board.handle_pointer(&InputEvent::from_pointer_up(240.0, 220.0, 20.0));
    assert_eq!(
        event,
        BoardEvent::Dropped {
            id,
            persisted: true
        }
    );
    assert_eq!(stored(&board), vec![("calendar".to_string(), 230.0, 210.0)]);
}

#[test]
fn proximity_policy_long_move_is_not_persisted() {
    let config = BoardConfig {
        match_policy: MatchPolicy::Proximity,
        ..BoardConfig::default()
    };
    let (mut board, messages) = make_board(config);
    let id = board.handle_drop("calendar", 225.0, 225.0).unwrap();

    board.handle_pointer(&down(210.0, 210.0, 0.0));
    board.handle_pointer(&InputEvent::from_pointer_move(410.0, 410.0, 10.0));
    let event = board.handle_pointer(&InputEvent::from_pointer_up(410.0, 410.0, 20.0));
    assert_eq!(
        event,
        BoardEvent::Dropped {
            id,
            persisted: false
        }
    );

    // On screen the sticker moved; the store still holds the old spot.
    let s = board.sticker(id).unwrap();
    assert_eq!((s.x, s.y), (400.0, 400.0));
    assert_eq!(stored(&board), vec![("calendar".to_string(), 200.0, 200.0)]);
    assert_eq!(messages.borrow().last().map(String::as_str), Some("Sticker moved"));
}

// ─── No store ───────────────────────────────────────────────────────────

#[test]
fn board_without_store_still_responds() {
    init_logging();
    let mut board: StickerBoard<MemoryStore> =
        StickerBoard::new(Catalog::builtin(), None, BoardConfig::default(), SURFACE);
    assert_eq!(board.restore(), 0);
    let id = board.handle_drop("notes", 100.0, 100.0).unwrap();

    board.handle_pointer(&down(100.0, 100.0, 0.0));
    board.handle_pointer(&InputEvent::from_pointer_move(200.0, 200.0, 10.0));
    let event = board.handle_pointer(&InputEvent::from_pointer_up(200.0, 200.0, 20.0));
    assert_eq!(
        event,
        BoardEvent::Dropped {
            id,
            persisted: false
        }
    );
    let s = board.sticker(id).unwrap();
    assert_eq!((s.x, s.y), (175.0, 175.0));
}

#[test]
fn store_document_round_trips_through_json() {
    let (mut board, _) = make_board(BoardConfig::default());
    board.handle_drop("analytics", 125.0, 175.0);
    let doc: serde_json::Value =
        serde_json::from_str(&board.registry().store().unwrap().to_json()).unwrap();
    assert_eq!(doc["stickerPositions"][0]["type"], json!("analytics"));
    assert_eq!(doc["stickerPositions"][0]["x"], json!(100.0));
    assert_eq!(doc["stickerPositions"][0]["y"], json!(150.0));
}
