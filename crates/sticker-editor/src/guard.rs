//! Post-drag click suppression.
//!
//! A click event fires right after the pointer-up that ended a drag. The
//! guard stays raised for a short window after the drag so that click is
//! recognised as part of the drag and ignored.

/// A single-shot timer measured against event timestamps.
#[derive(Debug, Clone)]
pub struct ClickGuard {
    delay_ms: f64,
    /// When the guard drops. `None` = not scheduled.
    deadline: Option<f64>,
}

impl ClickGuard {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// Raise the guard from `now` until `now + delay`. Replaces any pending deadline.
    pub fn schedule(&mut self, now: f64) {
        self.deadline = Some(now + self.delay_ms);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_scheduled(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether clicks at time `now` should be suppressed.
    pub fn is_active(&self, now: f64) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }

    /// Drop an expired deadline. Returns `true` if the guard fired.
    pub fn expire(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
