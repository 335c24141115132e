//! Drag controller: turns a pointer gesture into a committed sticker position.
//!
//! ```text
//!            primary down on sticker           first move
//!   Idle ─────────────────────────────▶ Armed ───────────▶ Dragging ──┐ move
//!    ▲                                    │                  │   ◀────┘
//!    │            up (no move) = click    │                  │
//!    ├────────────────────────────────────┘                  │
//!    │            up = finish drag, raise click guard        │
//!    └───────────────────────────────────────────────────────┘
//! ```
//!
//! At most one gesture is live at a time: the active gesture lives inside
//! the state value, so a second press while armed or dragging is ignored.

use crate::guard::ClickGuard;
use crate::input::InputEvent;
use sticker_core::geometry::clamp_origin;
use sticker_core::id::StickerId;
use sticker_core::model::{Footprint, Surface};

/// The sticker under the pointer when a press starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabTarget {
    pub id: StickerId,
    /// Sticker origin at press time.
    pub x: f32,
    pub y: f32,
}

/// The single in-flight gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveGesture {
    pub target: StickerId,
    /// Pointer position relative to the sticker origin at press time.
    pub offset_x: f32,
    pub offset_y: f32,
    /// Sticker origin before the gesture.
    pub start_x: f32,
    pub start_y: f32,
    /// Latest clamped sticker origin.
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Armed(ActiveGesture),
    Dragging(ActiveGesture),
}

/// What a handled event means for the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// A press on a sticker armed a gesture.
    Armed { id: StickerId },
    /// The sticker should be shown at `(x, y)`.
    Moved { id: StickerId, x: f32, y: f32 },
    /// A drag ended; `(x, y)` is the position to persist.
    Finished {
        id: StickerId,
        from: (f32, f32),
        x: f32,
        y: f32,
    },
    /// Press and release with no movement in between.
    Click { id: StickerId },
}

pub struct DragController {
    state: DragState,
    footprint: Footprint,
    guard: ClickGuard,
}

impl DragController {
    pub fn new(footprint: Footprint, click_guard_ms: f64) -> Self {
        Self {
            state: DragState::Idle,
            footprint,
            guard: ClickGuard::new(click_guard_ms),
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn active_gesture(&self) -> Option<ActiveGesture> {
        match self.state {
            DragState::Idle => None,
            DragState::Armed(g) | DragState::Dragging(g) => Some(g),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Whether a click arriving at `now` belongs to a drag and must be ignored.
    pub fn suppresses_click(&self, now: f64) -> bool {
        self.is_dragging() || self.guard.is_active(now)
    }

    /// Handle a pointer event. `hit` is the sticker under a press, if any;
    /// `surface` is the canvas size at the time of the event.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        hit: Option<GrabTarget>,
        surface: Surface,
    ) -> Option<DragOutcome> {
        self.guard.expire(event.time_ms());

        match (*event, self.state) {
            (InputEvent::PointerDown { x, y, button, .. }, DragState::Idle) => {
                if !button.is_primary() {
                    return None;
                }
                let target = hit?;
                // A fresh press clears any leftover guard from the last drag.
                self.guard.cancel();
                self.state = DragState::Armed(ActiveGesture {
                    target: target.id,
                    offset_x: x - target.x,
                    offset_y: y - target.y,
                    start_x: target.x,
                    start_y: target.y,
                    x: target.x,
                    y: target.y,
                });
                log::debug!("armed drag on {}", target.id);
                Some(DragOutcome::Armed { id: target.id })
            }
            (InputEvent::PointerDown { .. }, _) => None,

            (InputEvent::PointerMove { x, y, .. }, DragState::Armed(mut g))
            | (InputEvent::PointerMove { x, y, .. }, DragState::Dragging(mut g)) => {
                let (nx, ny) = clamp_origin(x - g.offset_x, y - g.offset_y, surface, self.footprint);
                g.x = nx;
                g.y = ny;
                self.state = DragState::Dragging(g);
                Some(DragOutcome::Moved {
                    id: g.target,
                    x: nx,
                    y: ny,
                })
            }
            (InputEvent::PointerMove { .. }, DragState::Idle) => None,

            (InputEvent::PointerUp { time_ms, .. }, DragState::Dragging(g)) => {
                self.state = DragState::Idle;
                self.guard.schedule(time_ms);
                log::debug!("finished drag on {} at ({}, {})", g.target, g.x, g.y);
                Some(DragOutcome::Finished {
                    id: g.target,
                    from: (g.start_x, g.start_y),
                    x: g.x,
                    y: g.y,
                })
            }
            (InputEvent::PointerUp { .. }, DragState::Armed(g)) => {
                self.state = DragState::Idle;
                Some(DragOutcome::Click { id: g.target })
            }
            (InputEvent::PointerUp { .. }, DragState::Idle) => None,
        }
    }
}
