//! Outside-click detection for an open editor.
//!
//! The host calls [`OutsideClickGuard::on_capture_pointer_down`] from a
//! window-level capture-phase listener, so it runs before anything in the
//! tree can stop the event. That mints a ticket for a check on the next
//! frame. A pointer-down that reaches the editor's own subtree cancels the
//! pending ticket; otherwise the frame callback confirms it and the editor
//! commits.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace};

/// Shared by every guard, so a ticket only ever matches the guard that
/// minted it.
static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Handle for one scheduled outside-click check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTicket(u64);

impl FrameTicket {
    fn mint() -> Self {
        Self(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug)]
pub struct OutsideClickGuard {
    enabled: bool,
    listening: bool,
    pending: Option<FrameTicket>,
}

impl OutsideClickGuard {
    /// A disabled guard never listens and never schedules.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            listening: enabled,
            pending: None,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn pending(&self) -> Option<FrameTicket> {
        self.pending
    }

    /// Capture phase: schedules a check unconditionally. An older pending
    /// ticket is superseded.
    pub fn on_capture_pointer_down(&mut self) -> Option<FrameTicket> {
        if !self.listening {
            return None;
        }
        let ticket = FrameTicket::mint();
        trace!(ticket = ticket.0, "outside click check scheduled");
        self.pending = Some(ticket);
        Some(ticket)
    }

    /// The pointer-down reached the editor's subtree.
    pub fn cancel(&mut self) {
        if let Some(FrameTicket(ticket)) = self.pending.take() {
            trace!(ticket, "outside click check cancelled");
        }
    }

    /// Frame callback: true when this ticket is still the pending one. The
    /// ticket is spent either way.
    pub fn confirm(&mut self, ticket: FrameTicket) -> bool {
        if self.listening && self.pending == Some(ticket) {
            self.pending = None;
            debug!(ticket = ticket.0, "outside click confirmed");
            true
        } else {
            trace!(ticket = ticket.0, "stale outside click ticket ignored");
            false
        }
    }

    /// Stops listening and drops any pending check.
    pub fn detach(&mut self) {
        if self.listening || self.pending.is_some() {
            trace!(enabled = self.enabled, "outside click guard detached");
        }
        self.listening = false;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outside_click_confirms_once() {
        let mut guard = OutsideClickGuard::new(true);
        let ticket = guard.on_capture_pointer_down().unwrap();
        assert!(guard.confirm(ticket));
        assert!(!guard.confirm(ticket));
    }

    #[test]
    fn in_tree_pointer_down_cancels() {
        let mut guard = OutsideClickGuard::new(true);
        let ticket = guard.on_capture_pointer_down().unwrap();
        guard.cancel();
        assert!(!guard.confirm(ticket));
        assert!(guard.is_listening());
    }

    #[test]
    fn only_the_latest_ticket_counts() {
        let mut guard = OutsideClickGuard::new(true);
        let first = guard.on_capture_pointer_down().unwrap();
        let second = guard.on_capture_pointer_down().unwrap();
        assert_ne!(first, second);
        assert!(!guard.confirm(first));
        assert!(guard.confirm(second));
    }

    #[test]
    fn tickets_belong_to_the_guard_that_minted_them() {
        let mut first = OutsideClickGuard::new(true);
        let mut second = OutsideClickGuard::new(true);
        let foreign = first.on_capture_pointer_down().unwrap();
        let own = second.on_capture_pointer_down().unwrap();
        assert!(!second.confirm(foreign));
        assert!(second.confirm(own));
        assert!(first.confirm(foreign));
    }

    #[test]
    fn disabled_guard_never_schedules() {
        let mut guard = OutsideClickGuard::new(false);
        assert!(!guard.is_listening());
        assert_eq!(guard.on_capture_pointer_down(), None);
    }

    #[test]
    fn detach_invalidates_the_pending_check() {
        let mut guard = OutsideClickGuard::new(true);
        let ticket = guard.on_capture_pointer_down().unwrap();
        guard.detach();
        assert!(!guard.is_listening());
        assert!(!guard.confirm(ticket));
        assert_eq!(guard.on_capture_pointer_down(), None);
    }
}
