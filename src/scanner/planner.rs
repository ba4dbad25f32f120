use alloy::primitives::BlockNumber;

use crate::types::ScanWindow;

/// Progress boundaries for the two scan directions.
///
/// The directions are deliberately independent: catching up with new blocks
/// must never wait on history, and walking history must not starve the
/// catch-up path of provider budget. The frontiers may cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frontiers {
    /// Highest height already fully scanned going forward.
    pub forward: BlockNumber,
    /// Highest height not yet covered by backward scanning. `None` means
    /// "anchor to the current head on first use".
    pub backfill: Option<BlockNumber>,
    /// Head height at which backfill last ran, throttles its cadence.
    pub last_backfill_tick: BlockNumber,
}

impl Frontiers {
    /// Frontiers for a fresh start at `head`: forward scanning begins with
    /// the next new block, backfill walks down from `head`.
    #[must_use]
    pub const fn seeded(head: BlockNumber) -> Self {
        Self { forward: head, backfill: Some(head), last_backfill_tick: 0 }
    }
}

/// Window policies for both scan directions.
///
/// Block height 1 is the earliest scannable height; 0 serves as the
/// exhausted-backfill floor.
#[derive(Debug, Clone, Copy)]
pub struct WindowPlanner {
    chunk_size: u64,
    scan_interval: u64,
}

impl WindowPlanner {
    #[must_use]
    pub const fn new(chunk_size: u64, scan_interval: u64) -> Self {
        Self { chunk_size, scan_interval }
    }

    /// Next catch-up window, or `None` when `forward` has reached `head`.
    #[must_use]
    pub fn next_forward(&self, frontiers: &Frontiers, head: BlockNumber) -> Option<ScanWindow> {
        let start = frontiers.forward.checked_add(1)?;
        if start > head {
            return None;
        }
        let stop = start.saturating_add(self.chunk_size - 1).min(head);
        Some(ScanWindow::new(start, stop))
    }

    /// Records a fully scanned forward window.
    pub fn commit_forward(&self, frontiers: &mut Frontiers, window: ScanWindow) {
        frontiers.forward = window.stop;
    }

    /// Whether enough head progress has accumulated to run backfill again.
    #[must_use]
    pub fn backfill_due(&self, frontiers: &Frontiers, head: BlockNumber) -> bool {
        head.saturating_sub(frontiers.last_backfill_tick) >= self.scan_interval
    }

    /// Next historical window, walking down toward height 1, or `None` once
    /// history is exhausted.
    ///
    /// An unset frontier, or one beyond `head` (stale checkpoint after the
    /// observed head moved backward), is re-anchored to `head` first.
    pub fn next_backfill(&self, frontiers: &mut Frontiers, head: BlockNumber) -> Option<ScanWindow> {
        let anchor = match frontiers.backfill {
            Some(frontier) if frontier <= head => frontier,
            _ => {
                frontiers.backfill = Some(head);
                head
            }
        };

        if anchor < 1 {
            return None;
        }
        let start = anchor.saturating_sub(self.chunk_size - 1).max(1);
        Some(ScanWindow::new(start, anchor))
    }

    /// Records a fully scanned backfill window and the head it ran at.
    pub fn commit_backfill(
        &self,
        frontiers: &mut Frontiers,
        window: ScanWindow,
        head: BlockNumber,
    ) {
        frontiers.backfill = Some(window.start - 1);
        frontiers.last_backfill_tick = head;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner() -> WindowPlanner {
        WindowPlanner::new(100, 5)
    }

    #[test]
    fn forward_reports_none_when_caught_up() {
        let frontiers = Frontiers::seeded(250);

        assert_eq!(planner().next_forward(&frontiers, 250), None);
    }

    #[test]
    fn forward_window_is_chunk_bounded() {
        let mut frontiers = Frontiers::seeded(250);

        let window = planner().next_forward(&frontiers, 500).unwrap();
        assert_eq!(window, ScanWindow::new(251, 350));

        planner().commit_forward(&mut frontiers, window);
        assert_eq!(frontiers.forward, 350);
    }

    #[test]
    fn forward_window_caps_at_head() {
        let frontiers = Frontiers::seeded(250);

        let window = planner().next_forward(&frontiers, 260).unwrap();
        assert_eq!(window, ScanWindow::new(251, 260));
    }

    #[test]
    fn forward_walks_to_head_in_chunks() {
        let planner = planner();
        let mut frontiers = Frontiers::seeded(0);
        let mut windows = vec![];

        while let Some(window) = planner.next_forward(&frontiers, 250) {
            windows.push((window.start, window.stop));
            planner.commit_forward(&mut frontiers, window);
        }

        assert_eq!(windows, vec![(1, 100), (101, 200), (201, 250)]);
        assert_eq!(planner.next_forward(&frontiers, 250), None);
    }

    #[test]
    fn backfill_walks_down_from_head() {
        let planner = planner();
        let mut frontiers = Frontiers::seeded(250);
        let mut windows = vec![];

        while let Some(window) = planner.next_backfill(&mut frontiers, 250) {
            windows.push((window.start, window.stop));
            planner.commit_backfill(&mut frontiers, window, 250);
        }

        assert_eq!(windows, vec![(151, 250), (51, 150), (1, 50)]);
        assert_eq!(frontiers.backfill, Some(0));
        assert_eq!(planner.next_backfill(&mut frontiers, 250), None);
    }

    #[test]
    fn backfill_anchors_unset_frontier_to_head() {
        let planner = planner();
        let mut frontiers =
            Frontiers { forward: 250, backfill: None, last_backfill_tick: 0 };

        let window = planner.next_backfill(&mut frontiers, 250).unwrap();
        assert_eq!(window, ScanWindow::new(151, 250));
        assert_eq!(frontiers.backfill, Some(250));
    }

    #[test]
    fn backfill_re_anchors_frontier_beyond_head() {
        let planner = planner();
        let mut frontiers =
            Frontiers { forward: 250, backfill: Some(900), last_backfill_tick: 0 };

        let window = planner.next_backfill(&mut frontiers, 250).unwrap();
        assert_eq!(window, ScanWindow::new(151, 250));
    }

    #[test]
    fn backfill_clamps_final_window_to_height_one() {
        let planner = planner();
        let mut frontiers =
            Frontiers { forward: 250, backfill: Some(40), last_backfill_tick: 0 };

        let window = planner.next_backfill(&mut frontiers, 250).unwrap();
        assert_eq!(window, ScanWindow::new(1, 40));

        planner.commit_backfill(&mut frontiers, window, 250);
        assert_eq!(planner.next_backfill(&mut frontiers, 250), None);
    }

    #[test]
    fn backfill_cadence_follows_scan_interval() {
        let planner = planner();
        let mut frontiers = Frontiers::seeded(250);

        assert!(planner.backfill_due(&frontiers, 250));

        let window = planner.next_backfill(&mut frontiers, 250).unwrap();
        planner.commit_backfill(&mut frontiers, window, 250);

        assert!(!planner.backfill_due(&frontiers, 254));
        assert!(planner.backfill_due(&frontiers, 255));
    }

    #[test]
    fn commit_records_the_head_backfill_ran_at() {
        let planner = planner();
        let mut frontiers = Frontiers::seeded(250);

        let window = planner.next_backfill(&mut frontiers, 253).unwrap();
        planner.commit_backfill(&mut frontiers, window, 253);

        assert_eq!(frontiers.last_backfill_tick, 253);
    }

    #[test]
    fn frontiers_may_cross() {
        let planner = planner();
        let mut frontiers = Frontiers::seeded(250);

        // forward advances well past the backfill frontier
        let window = planner.next_forward(&frontiers, 600).unwrap();
        planner.commit_forward(&mut frontiers, window);
        assert_eq!(frontiers.forward, 350);

        // backfill still walks down from its own frontier
        let window = planner.next_backfill(&mut frontiers, 600).unwrap();
        assert_eq!(window, ScanWindow::new(151, 250));
    }
}
