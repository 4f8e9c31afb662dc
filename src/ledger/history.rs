use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::record::Record;

/// Decides when `undo` is allowed to restore a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UndoPolicy {
    /// Every append can be undone, down to an empty ledger.
    #[default]
    AllowEmpty,
    /// The first appended record is permanent: undo needs two snapshots.
    KeepFirstEntry,
}

impl UndoPolicy {
    pub const ALL: [UndoPolicy; 2] = [UndoPolicy::AllowEmpty, UndoPolicy::KeepFirstEntry];

    pub fn key(&self) -> &'static str {
        match self {
            UndoPolicy::AllowEmpty => "allow-empty",
            UndoPolicy::KeepFirstEntry => "keep-first-entry",
        }
    }

    fn min_snapshots(&self) -> usize {
        match self {
            UndoPolicy::AllowEmpty => 1,
            UndoPolicy::KeepFirstEntry => 2,
        }
    }
}

impl fmt::Display for UndoPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for UndoPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "allow-empty" => Ok(UndoPolicy::AllowEmpty),
            "keep-first-entry" | "keep-first" => Ok(UndoPolicy::KeepFirstEntry),
            other => Err(format!(
                "unknown undo policy `{other}` (use `allow-empty` or `keep-first-entry`)"
            )),
        }
    }
}

/// Stack of record-sequence snapshots, one per append.
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<Vec<Record>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, records: &[Record]) {
        self.snapshots.push(records.to_vec());
    }

    pub fn can_restore(&self, policy: UndoPolicy) -> bool {
        self.snapshots.len() >= policy.min_snapshots()
    }

    /// Pops the latest snapshot if the policy allows it.
    pub fn restore(&mut self, policy: UndoPolicy) -> Option<Vec<Record>> {
        if !self.can_restore(policy) {
            return None;
        }
        self.snapshots.pop()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(client: &str) -> Record {
        Record::hours("01-02-2024", client, "1").unwrap()
    }

    #[test]
    fn keep_first_entry_needs_two_snapshots() {
        let mut history = History::new();
        history.record(&[]);
        assert!(!history.can_restore(UndoPolicy::KeepFirstEntry));
        assert!(history.can_restore(UndoPolicy::AllowEmpty));

        history.record(&[record("a")]);
        let restored = history.restore(UndoPolicy::KeepFirstEntry).unwrap();
        assert_eq!(restored, vec![record("a")]);
        assert_eq!(history.len(), 1);
        assert!(history.restore(UndoPolicy::KeepFirstEntry).is_none());
    }

    #[test]
    fn policy_round_trips_through_text() {
        for policy in [UndoPolicy::AllowEmpty, UndoPolicy::KeepFirstEntry] {
            assert_eq!(policy.to_string().parse::<UndoPolicy>(), Ok(policy));
        }
    }
}
