use std::collections::{BTreeMap, BTreeSet};

use alloy::primitives::{Address, BlockNumber};

/// Freshness-based deduplication over discovered debtors.
///
/// Tracks the highest height each address was observed at and the backlog of
/// addresses awaiting downstream handling. An address is enqueued again when
/// it reappears at a strictly greater height, even if a previous backlog
/// entry was already drained: a new borrow is meaningful for an
/// already-known debtor. Observations at or below the recorded height are
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupBacklog {
    seen_height: BTreeMap<Address, BlockNumber>,
    backlog: BTreeSet<Address>,
}

impl DedupBacklog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        seen_height: BTreeMap<Address, BlockNumber>,
        backlog: BTreeSet<Address>,
    ) -> Self {
        Self { seen_height, backlog }
    }

    /// Enqueues `address` iff this observation is fresher than anything
    /// recorded for it. Returns `true` iff the address was newly enqueued.
    pub fn enqueue_if_newer(&mut self, address: Address, observed_height: BlockNumber) -> bool {
        let newer = match self.seen_height.get(&address) {
            None => true,
            Some(&seen) => seen < observed_height,
        };

        if newer {
            self.seen_height.insert(address, observed_height);
            self.backlog.insert(address);
        }

        newer
    }

    /// Removes and returns all pending backlog entries.
    pub fn drain_backlog(&mut self) -> BTreeSet<Address> {
        std::mem::take(&mut self.backlog)
    }

    #[must_use]
    pub fn seen_height(&self) -> &BTreeMap<Address, BlockNumber> {
        &self.seen_height
    }

    #[must_use]
    pub fn backlog(&self) -> &BTreeSet<Address> {
        &self.backlog
    }

    #[must_use]
    pub fn seen_len(&self) -> usize {
        self.seen_height.len()
    }

    #[must_use]
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBTOR: Address = Address::repeat_byte(0xda);

    #[test]
    fn first_observation_enqueues() {
        let mut dedup = DedupBacklog::new();

        assert!(dedup.enqueue_if_newer(DEBTOR, 500));
        assert!(dedup.backlog().contains(&DEBTOR));
        assert_eq!(dedup.seen_height().get(&DEBTOR), Some(&500));
    }

    #[test]
    fn increasing_height_re_enqueues() {
        let mut dedup = DedupBacklog::new();

        assert!(dedup.enqueue_if_newer(DEBTOR, 100));
        assert!(dedup.enqueue_if_newer(DEBTOR, 101));
        assert_eq!(dedup.seen_height().get(&DEBTOR), Some(&101));
    }

    #[test]
    fn equal_height_is_idempotent() {
        let mut dedup = DedupBacklog::new();

        assert!(dedup.enqueue_if_newer(DEBTOR, 100));
        assert!(!dedup.enqueue_if_newer(DEBTOR, 100));
        assert_eq!(dedup.backlog_len(), 1);
    }

    #[test]
    fn lower_height_is_dropped() {
        let mut dedup = DedupBacklog::new();

        assert!(dedup.enqueue_if_newer(DEBTOR, 500));
        assert!(!dedup.enqueue_if_newer(DEBTOR, 480));
        assert_eq!(dedup.seen_height().get(&DEBTOR), Some(&500));
    }

    #[test]
    fn drained_entry_returns_on_fresher_observation() {
        let mut dedup = DedupBacklog::new();

        assert!(dedup.enqueue_if_newer(DEBTOR, 100));
        let drained = dedup.drain_backlog();
        assert_eq!(drained, BTreeSet::from([DEBTOR]));
        assert_eq!(dedup.backlog_len(), 0);

        assert!(dedup.enqueue_if_newer(DEBTOR, 150));
        assert!(dedup.backlog().contains(&DEBTOR));
    }

    #[test]
    fn drained_entry_stays_out_at_equal_height() {
        let mut dedup = DedupBacklog::new();

        dedup.enqueue_if_newer(DEBTOR, 100);
        dedup.drain_backlog();

        assert!(!dedup.enqueue_if_newer(DEBTOR, 100));
        assert_eq!(dedup.backlog_len(), 0);
    }

    #[test]
    fn distinct_addresses_tracked_independently() {
        let other = Address::repeat_byte(0xdb);
        let mut dedup = DedupBacklog::new();

        assert!(dedup.enqueue_if_newer(DEBTOR, 10));
        assert!(dedup.enqueue_if_newer(other, 5));
        assert_eq!(dedup.seen_len(), 2);
        assert_eq!(dedup.backlog_len(), 2);
    }
}
