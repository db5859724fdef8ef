//! Request-generation guard for asynchronous loads.
//!
//! Every template/suggestion request takes a ticket before it is sent.
//! When the response arrives, only the most recently issued ticket may touch
//! the designer; older responses are discarded.

use fo_core::FormError;

/// Monotonic token identifying one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn get(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadTracker {
    issued: u64,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, superseding every earlier one.
    pub fn issue(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    /// Supersede every outstanding ticket without issuing a new one. Called
    /// when the designer's state is replaced locally (clear, import).
    pub fn invalidate(&mut self) {
        self.issued += 1;
    }

    /// The latest issued ticket, if any.
    pub fn latest(&self) -> Option<LoadTicket> {
        (self.issued > 0).then_some(LoadTicket(self.issued))
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.issued && self.issued > 0
    }

    /// Check a ticket on response arrival.
    ///
    /// # Errors
    /// `FormError::StaleLoad` when a newer ticket has been issued since.
    pub fn accept(&self, ticket: LoadTicket) -> Result<(), FormError> {
        if self.is_current(ticket) {
            Ok(())
        } else {
            log::warn!(
                "discarding load #{} (latest is #{})",
                ticket.0,
                self.issued
            );
            Err(FormError::StaleLoad {
                ticket: ticket.0,
                latest: self.issued,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_is_accepted() {
        let mut tracker = LoadTracker::new();
        assert_eq!(tracker.latest(), None);
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(first < second);
        assert!(matches!(
            tracker.accept(first),
            Err(FormError::StaleLoad { ticket: 1, latest: 2 })
        ));
        assert!(tracker.accept(second).is_ok());
        assert_eq!(tracker.latest(), Some(second));
    }

    #[test]
    fn invalidate_supersedes_outstanding_ticket() {
        let mut tracker = LoadTracker::new();
        let pending = tracker.issue();
        tracker.invalidate();
        assert!(!tracker.is_current(pending));
        assert!(tracker.accept(pending).is_err());
        let next = tracker.issue();
        assert!(tracker.accept(next).is_ok());
    }

    #[test]
    fn unissued_ticket_is_rejected() {
        let tracker = LoadTracker::new();
        assert!(tracker.accept(LoadTicket::from_raw(0)).is_err());
    }
}
