use tracing::debug;

use super::{
    history::{History, UndoPolicy},
    record::{RawEntry, Record, Total, Variant},
};
use crate::errors::LedgerError;

/// In-memory timesheet: ordered records, a running total, undo snapshots and
/// the document title.
#[derive(Debug, Clone)]
pub struct Ledger {
    variant: Variant,
    records: Vec<Record>,
    total: Total,
    history: History,
    header: String,
    undo_policy: UndoPolicy,
}

impl Ledger {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            records: Vec::new(),
            total: Total::zero(variant),
            history: History::new(),
            header: String::new(),
            undo_policy: UndoPolicy::default(),
        }
    }

    pub fn with_undo_policy(mut self, policy: UndoPolicy) -> Self {
        self.undo_policy = policy;
        self
    }

    /// Appends a validated record, snapshotting the previous sequence first.
    pub fn add_record(&mut self, record: Record) -> Result<(), LedgerError> {
        let found = record.variant();
        if found != self.variant {
            return Err(LedgerError::ShapeMismatch {
                expected: self.variant,
                found,
            });
        }
        let total = self
            .total
            .checked_add(&record)
            .ok_or(LedgerError::TotalOverflow)?;
        self.history.record(&self.records);
        self.total = total;
        self.records.push(record);
        debug!(
            records = self.records.len(),
            total = %self.total,
            "record appended"
        );
        Ok(())
    }

    /// Validates raw form fields and appends the resulting record.
    pub fn add_entry(&mut self, raw: &RawEntry) -> Result<&Record, LedgerError> {
        let record = Record::from_raw(raw)?;
        self.add_record(record)?;
        Ok(&self.records[self.records.len() - 1])
    }

    /// Restores the sequence from before the latest append. Returns `false`
    /// when the undo policy leaves nothing to restore.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.restore(self.undo_policy) else {
            debug!(policy = %self.undo_policy, "nothing to undo");
            return false;
        };
        self.records = previous;
        self.total = self.total_duration();
        debug!(records = self.records.len(), total = %self.total, "undo applied");
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_restore(self.undo_policy)
    }

    /// Sum of every current record, computed from scratch.
    pub fn total_duration(&self) -> Total {
        Total::of(self.variant, &self.records)
    }

    /// The accumulator maintained across appends and undos.
    pub fn running_total(&self) -> Total {
        self.total
    }

    pub fn set_header(&mut self, header: impl Into<String>) {
        self.header = header.into();
    }

    pub fn clear_header(&mut self) {
        self.header.clear();
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn undo_policy(&self) -> UndoPolicy {
        self.undo_policy
    }

    pub fn set_undo_policy(&mut self, policy: UndoPolicy) {
        self.undo_policy = policy;
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(Variant::default())
    }
}
