use alloy::primitives::BlockNumber;

use crate::types::ScanWindow;

/// Splits an inclusive block range into ordered sub-ranges of bounded size.
///
/// Yields windows from `start` toward `stop`, ascending, each covering at
/// most `step` blocks. The concatenation of all yielded windows covers
/// `[start, stop]` exactly once. An inverted range yields nothing.
#[derive(Debug, Clone)]
pub struct RangeSplitter {
    current: BlockNumber,
    stop: BlockNumber,
    step: u64,
    yielded: u64,
    total: u64,
}

impl RangeSplitter {
    /// Creates a splitter over `[start, stop]` with sub-ranges of at most
    /// `step` blocks.
    ///
    /// # Panics
    ///
    /// Panics if `step` is 0.
    #[must_use]
    pub const fn new(start: BlockNumber, stop: BlockNumber, step: u64) -> Self {
        assert!(step >= 1, "step must be at least 1");
        let total = if start > stop { 0 } else { (stop - start) / step + 1 };
        Self { current: start, stop, step, yielded: 0, total }
    }
}

impl Iterator for RangeSplitter {
    type Item = ScanWindow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.yielded >= self.total {
            return None;
        }
        self.yielded += 1;

        let start = self.current;
        let stop = start.saturating_add(self.step - 1).min(self.stop);
        // yielded/total guards termination, so a saturated advance is fine
        self.current = stop.saturating_add(1);

        Some(ScanWindow::new(start, stop))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.total - self.yielded) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}
