// ── Refresh ordering ──
//
// Every list refresh takes a ticket from a monotonic counter. A response is
// applied only if its ticket is newer than the last one applied, so a slow
// early response can never overwrite a fresher list.

/// Handle for one in-flight refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct RefreshTicket(u64);

#[derive(Debug, Default)]
pub(crate) struct RefreshSequencer {
    issued: u64,
    applied: u64,
}

impl RefreshSequencer {
    pub(crate) fn issue(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// `true` once a newer refresh has been applied. Does not claim.
    pub(crate) fn is_superseded(&self, ticket: RefreshTicket) -> bool {
        ticket.0 <= self.applied
    }

    /// Claim the right to apply a response. `false` means it is stale.
    pub(crate) fn accept(&mut self, ticket: RefreshTicket) -> bool {
        if self.is_superseded(ticket) {
            return false;
        }
        self.applied = ticket.0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_order_responses_apply() {
        let mut seq = RefreshSequencer::default();
        let a = seq.issue();
        assert!(seq.accept(a));
        let b = seq.issue();
        assert!(seq.accept(b));
    }

    #[test]
    fn older_response_after_newer_is_discarded() {
        let mut seq = RefreshSequencer::default();
        let early = seq.issue();
        let late = seq.issue();
        assert!(seq.accept(late));
        assert!(!seq.accept(early));
    }

    #[test]
    fn same_ticket_applies_once() {
        let mut seq = RefreshSequencer::default();
        let t = seq.issue();
        assert!(seq.accept(t));
        assert!(!seq.accept(t));
    }

    #[test]
    fn pending_ticket_is_superseded_once_newer_applies() {
        let mut seq = RefreshSequencer::default();
        let early = seq.issue();
        let late = seq.issue();
        assert!(!seq.is_superseded(early));
        assert!(seq.accept(late));
        assert!(seq.is_superseded(early));
    }
}
