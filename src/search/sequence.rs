/// Orders asynchronous lookups so the last keystroke wins.
#[derive(Debug, Clone, Default)]
pub struct SequenceGuard {
    latest: u64,
}

impl SequenceGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number the next dispatched lookup. Earlier numbers become stale.
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }

    /// Whether a response may be applied; stale ones are logged and dropped.
    pub fn accept(&self, seq: u64) -> bool {
        if self.is_current(seq) {
            true
        } else {
            tracing::debug!(seq, latest = self.latest, "dropping stale lookup response");
            false
        }
    }

    /// Invalidate everything in flight.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn late_response_for_older_query_is_rejected() {
        let mut guard = SequenceGuard::new();
        let first = guard.issue();
        let second = guard.issue();
        assert!(guard.accept(second));
        assert!(!guard.accept(first));
    }

    #[test]
    fn invalidate_rejects_in_flight_lookups() {
        let mut guard = SequenceGuard::new();
        let seq = guard.issue();
        guard.invalidate();
        assert!(!guard.accept(seq));
    }
}
