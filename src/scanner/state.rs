use alloy::primitives::BlockNumber;

use crate::{
    scanner::{checkpoint::Checkpoint, dedup::DedupBacklog, planner::Frontiers},
    types::StateSummary,
};

/// The mutable scanner state, always accessed under the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerState {
    pub frontiers: Frontiers,
    pub dedup: DedupBacklog,
    /// Lifetime window counter, feeds the per-window progress line. Not
    /// persisted.
    pub windows_scanned: u64,
}

impl ScannerState {
    /// Fresh state at the given head: both frontiers seed from `head`, so
    /// the engine reports caught-up immediately and discovers history
    /// through backfill.
    #[must_use]
    pub fn fresh(head: BlockNumber) -> Self {
        Self { frontiers: Frontiers::seeded(head), dedup: DedupBacklog::new(), windows_scanned: 0 }
    }

    /// State restored from a checkpoint, with frontiers capped to `head` in
    /// case the observed head moved backward since the checkpoint was
    /// written.
    #[must_use]
    pub fn restore(checkpoint: Checkpoint, head: BlockNumber) -> Self {
        let frontiers = Frontiers {
            forward: checkpoint.forward_frontier.min(head),
            backfill: checkpoint.backfill_frontier.map(|frontier| frontier.min(head)),
            last_backfill_tick: 0,
        };
        Self {
            frontiers,
            dedup: DedupBacklog::from_parts(checkpoint.seen_height, checkpoint.backlog),
            windows_scanned: 0,
        }
    }

    /// Serializable snapshot of the persistent fields.
    #[must_use]
    pub fn snapshot(&self) -> Checkpoint {
        Checkpoint {
            forward_frontier: self.frontiers.forward,
            backfill_frontier: self.frontiers.backfill,
            seen_height: self.dedup.seen_height().clone(),
            backlog: self.dedup.backlog().clone(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> StateSummary {
        StateSummary {
            forward_frontier: self.frontiers.forward,
            backfill_frontier: self.frontiers.backfill,
            last_backfill_tick: self.frontiers.last_backfill_tick,
            seen_len: self.dedup.seen_len(),
            backlog_len: self.dedup.backlog_len(),
        }
    }
}
