use std::collections::HashSet;

use alloy::primitives::Address;

use crate::types::LogRecord;

/// Projects borrower addresses out of records whose instrument is tracked.
///
/// The tracked set is fixed at construction. Records against other
/// instruments are not an error, they simply do not match.
#[derive(Debug, Clone)]
pub struct DebtorExtractor {
    allowed: HashSet<Address>,
}

impl DebtorExtractor {
    #[must_use]
    pub fn new(allowed: HashSet<Address>) -> Self {
        Self { allowed }
    }

    /// Returns the borrower address iff the record's instrument is tracked.
    #[must_use]
    pub fn extract(&self, record: &LogRecord) -> Option<Address> {
        self.allowed.contains(&record.instrument).then_some(record.borrower)
    }
}
