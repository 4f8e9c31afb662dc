#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use tempfile::TempDir;
use worklog_core::ledger::{Ledger, Record, UndoPolicy, Variant};

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that is removed when the test binary exits.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Elapsed-hours ledger holding one record per `(date, client, hours)` tuple.
pub fn hours_ledger(entries: &[(&str, &str, &str)]) -> Ledger {
    let mut ledger = Ledger::new(Variant::ElapsedHours);
    for (date, client, hours) in entries {
        let record = Record::hours(date, client, hours).expect("valid hours record");
        ledger.add_record(record).expect("matching shape");
    }
    ledger
}

/// Shift-times ledger holding one record per `(date, client, start, end, break)` tuple.
pub fn shift_ledger(entries: &[(&str, &str, &str, &str, bool)]) -> Ledger {
    let mut ledger = Ledger::new(Variant::ShiftTimes).with_undo_policy(UndoPolicy::AllowEmpty);
    for (date, client, start, end, took_break) in entries {
        let record =
            Record::shift(date, client, start, end, *took_break).expect("valid shift record");
        ledger.add_record(record).expect("matching shape");
    }
    ledger
}

/// Elapsed-hours ledger with `count` one-hour rows, enough to force page breaks.
pub fn long_ledger(count: usize) -> Ledger {
    let mut ledger = Ledger::new(Variant::ElapsedHours);
    ledger.set_header("Timeliste");
    for idx in 0..count {
        let client = format!("Kunde {idx}");
        let record = Record::hours("02-01-2024", &client, "1").expect("valid hours record");
        ledger.add_record(record).expect("matching shape");
    }
    ledger
}
