//! Trailing-edge debouncer over injected time.

use std::time::Duration;
use tracing::debug;

/// Fires once, `window` after the most recent trigger. Triggering while a
/// deadline is pending cancels it and schedules a fresh one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Duration>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Schedules a firing at `now + window`, replacing any pending one.
    pub fn trigger(&mut self, now: Duration) {
        let deadline = now.saturating_add(self.window);
        if let Some(previous) = self.deadline.replace(deadline) {
            debug!(?previous, ?deadline, "debounce re-armed");
        }
    }

    /// Returns true exactly once per quiet window, on the first poll at or
    /// after the deadline.
    pub fn fire(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
