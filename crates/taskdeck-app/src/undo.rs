//! Single-slot undo window for deleted tasks.

use std::time::Duration;

use taskdeck_core::Task;
use tokio::time::Instant;

/// Default length of the undo window.
pub const DEFAULT_UNDO_WINDOW: Duration = Duration::from_secs(5);

/// The most recently deleted task and when its undo window closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    /// Task as it was in the mirror before deletion.
    pub task: Task,
    /// Instant after which undo is no longer offered.
    pub deadline: Instant,
}

impl PendingDeletion {
    fn is_open(&self, now: Instant) -> bool {
        now < self.deadline
    }
}

/// Holds at most one pending deletion; a newer deletion replaces it.
#[derive(Debug, Clone)]
pub struct UndoSlot {
    window: Duration,
    pending: Option<PendingDeletion>,
}

impl Default for UndoSlot {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_WINDOW)
    }
}

impl UndoSlot {
    /// Empty slot with the given window length.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Configured window length.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Start a window for `task`, returning whatever pending task it displaced.
    pub fn arm(&mut self, task: Task, now: Instant) -> Option<Task> {
        let deadline = now + self.window;
        self.pending
            .replace(PendingDeletion { task, deadline })
            .map(|previous| previous.task)
    }

    /// Pending task whose window is still open.
    #[must_use]
    pub fn peek(&self, now: Instant) -> Option<&PendingDeletion> {
        self.pending.as_ref().filter(|pending| pending.is_open(now))
    }

    /// Empty the slot, returning the pending task only if its window is open.
    pub fn take(&mut self, now: Instant) -> Option<PendingDeletion> {
        self.pending.take().filter(|pending| pending.is_open(now))
    }

    /// Put back a pending deletion taken by [`take`](Self::take), keeping its deadline.
    ///
    /// Ignored when a newer deletion already occupies the slot.
    pub fn restore(&mut self, pending: PendingDeletion) {
        if self.pending.is_none() {
            self.pending = Some(pending);
        }
    }

    /// Drop the pending task once its window has elapsed. Returns true if one was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.pending.as_ref().is_some_and(|pending| !pending.is_open(now)) {
            self.pending = None;
            return true;
        }
        false
    }

    /// Time left before the pending task can no longer be restored.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.peek(now).map(|pending| pending.deadline - now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_core::TaskDraft;

    fn task(text: &str) -> Task {
        TaskDraft::new(text, "2024-01-01", "10:00")
            .into_task("2024-01-01T00:00:00Z".into())
            .unwrap_or_else(|err| panic!("draft must be valid: {err}"))
    }

    #[test]
    fn window_closes_at_deadline() {
        let now = Instant::now();
        let mut slot = UndoSlot::new(Duration::from_secs(5));
        assert!(slot.arm(task("a"), now).is_none());

        assert!(slot.peek(now + Duration::from_secs(4)).is_some());
        assert!(slot.peek(now + Duration::from_secs(5)).is_none());
        assert_eq!(slot.remaining(now + Duration::from_secs(2)), Some(Duration::from_secs(3)));
    }

    #[test]
    fn newer_deletion_replaces_older() {
        let now = Instant::now();
        let mut slot = UndoSlot::default();
        slot.arm(task("first"), now);
        let displaced = slot.arm(task("second"), now);
        assert_eq!(displaced.map(|t| t.text), Some("first".to_owned()));
        assert_eq!(slot.take(now).map(|p| p.task.text), Some("second".to_owned()));
        assert!(slot.take(now).is_none());
    }

    #[test]
    fn take_after_deadline_clears_without_returning() {
        let now = Instant::now();
        let mut slot = UndoSlot::new(Duration::from_secs(1));
        slot.arm(task("late"), now);
        assert!(slot.take(now + Duration::from_secs(2)).is_none());
        assert!(slot.peek(now).is_none());
    }

    #[test]
    fn expire_only_drops_closed_windows() {
        let now = Instant::now();
        let mut slot = UndoSlot::new(Duration::from_secs(1));
        slot.arm(task("x"), now);
        assert!(!slot.expire(now));
        assert!(slot.expire(now + Duration::from_secs(1)));
        assert!(!slot.expire(now + Duration::from_secs(1)));
    }

    #[test]
    fn restore_does_not_clobber_newer_deletion() {
        let now = Instant::now();
        let mut slot = UndoSlot::default();
        slot.arm(task("old"), now);
        let taken = slot.take(now).unwrap_or_else(|| panic!("window open"));
        slot.arm(task("new"), now);
        slot.restore(taken);
        assert_eq!(slot.peek(now).map(|p| p.task.text.as_str()), Some("new"));
    }
}
