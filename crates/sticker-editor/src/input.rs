//! Input abstraction layer.
//!
//! Normalizes mouse, touch, and pen events into a unified `InputEvent`
//! consumed by the drag controller. Coordinates are canvas-local pixels;
//! timestamps are milliseconds on the host's monotonic clock
//! (`performance.now()` in the browser).

use serde::{Deserialize, Serialize};

/// Which button started a pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Auxiliary,
    Secondary,
    Other(i16),
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` index.
    pub fn from_index(index: i16) -> Self {
        match index {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            n => Self::Other(n),
        }
    }

    pub fn is_primary(self) -> bool {
        self == Self::Primary
    }
}

/// A normalized pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start, pen contact).
    PointerDown {
        x: f32,
        y: f32,
        button: PointerButton,
        time_ms: f64,
    },

    /// Pointer moved anywhere in the document.
    PointerMove { x: f32, y: f32, time_ms: f64 },

    /// Pointer released anywhere in the document.
    PointerUp { x: f32, y: f32, time_ms: f64 },
}

impl InputEvent {
    pub fn from_pointer_down(x: f32, y: f32, button: PointerButton, time_ms: f64) -> Self {
        Self::PointerDown {
            x,
            y,
            button,
            time_ms,
        }
    }

    pub fn from_pointer_move(x: f32, y: f32, time_ms: f64) -> Self {
        Self::PointerMove { x, y, time_ms }
    }

    pub fn from_pointer_up(x: f32, y: f32, time_ms: f64) -> Self {
        Self::PointerUp { x, y, time_ms }
    }

    pub fn position(&self) -> (f32, f32) {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. } => (*x, *y),
        }
    }

    pub fn time_ms(&self) -> f64 {
        match self {
            Self::PointerDown { time_ms, .. }
            | Self::PointerMove { time_ms, .. }
            | Self::PointerUp { time_ms, .. } => *time_ms,
        }
    }
}
