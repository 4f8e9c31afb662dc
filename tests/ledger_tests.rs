mod common;

use common::{hours_ledger, shift_ledger};
use worklog_core::errors::{FormatError, LedgerError};
use worklog_core::ledger::{Ledger, RawEntry, Record, Total, UndoPolicy, Variant};

#[test]
fn hours_total_is_exact_decimal_sum() {
    let ledger = hours_ledger(&[
        ("01-03-2024", "Acme", "1.0"),
        ("02-03-2024", "Acme", "2.5"),
        ("03-03-2024", "Storgata 1", "0.5"),
    ]);
    assert_eq!(ledger.total_duration().to_string(), "4.00");
    assert_eq!(ledger.running_total(), ledger.total_duration());

    let tenths = hours_ledger(&[
        ("01-03-2024", "A", "0.1"),
        ("01-03-2024", "A", "0.2"),
    ]);
    assert_eq!(tenths.total_duration().to_string(), "0.30");
}

#[test]
fn shift_total_counts_minutes() {
    let ledger = shift_ledger(&[
        ("01-03-2024", "Acme", "08:00", "09:00", false),
        ("02-03-2024", "Acme", "08:00", "11:00", true),
        ("03-03-2024", "Acme", "9:00", "9:30", false),
    ]);
    assert_eq!(ledger.total_duration(), Total::Minutes(240));
    assert_eq!(ledger.total_duration().to_string(), "4:00");
}

#[test]
fn undo_restores_previous_sequence_and_total() {
    let mut ledger = hours_ledger(&[("01-03-2024", "Acme", "3"), ("02-03-2024", "Acme", "2")]);
    let before: Vec<Record> = ledger.records()[..1].to_vec();

    assert!(ledger.undo());
    assert_eq!(ledger.records(), &before[..]);
    assert_eq!(ledger.total_duration().to_string(), "3.00");
    assert_eq!(ledger.running_total(), ledger.total_duration());
}

#[test]
fn repeated_undo_walks_back_in_order() {
    let mut ledger = hours_ledger(&[
        ("01-03-2024", "A", "1"),
        ("02-03-2024", "B", "2"),
        ("03-03-2024", "C", "4"),
    ]);
    let mut totals = Vec::new();
    while ledger.undo() {
        totals.push(ledger.total_duration().to_string());
    }
    assert_eq!(totals, vec!["3.00", "1.00", "0.00"]);
    assert!(ledger.is_empty());
    assert!(!ledger.undo());
}

#[test]
fn keep_first_entry_policy_never_empties_the_ledger() {
    let mut ledger = Ledger::new(Variant::ElapsedHours).with_undo_policy(UndoPolicy::KeepFirstEntry);
    ledger
        .add_entry(&RawEntry::hours("01-03-2024", "Acme", "1"))
        .unwrap();
    assert!(!ledger.can_undo());
    assert!(!ledger.undo());
    assert_eq!(ledger.len(), 1);

    ledger
        .add_entry(&RawEntry::hours("02-03-2024", "Acme", "2"))
        .unwrap();
    assert!(ledger.undo());
    assert_eq!(ledger.len(), 1);
    assert!(!ledger.undo());
}

#[test]
fn undo_on_empty_ledger_is_a_no_op() {
    let mut ledger = Ledger::default();
    assert!(!ledger.undo());
    assert_eq!(ledger.total_duration(), Total::zero(Variant::ElapsedHours));
}

#[test]
fn invalid_entries_change_nothing() {
    let mut ledger = hours_ledger(&[("01-03-2024", "Acme", "1")]);
    let cases = [
        RawEntry::hours("2024-03-01", "Acme", "1"),
        RawEntry::hours("31-02-2024", "Acme", "1"),
        RawEntry::hours("01-03-2024", "Acme", "abc"),
        RawEntry::hours("01-03-2024", "Acme", "-2"),
    ];
    for raw in &cases {
        assert!(ledger.add_entry(raw).is_err(), "{raw:?} was accepted");
    }
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.history_len(), 1);
    assert_eq!(ledger.total_duration().to_string(), "1.00");
}

#[test]
fn shift_validation_errors_are_specific() {
    let mut ledger = Ledger::new(Variant::ShiftTimes);
    let err = ledger
        .add_entry(&RawEntry::shift("01-03-2024", "Acme", "16:00", "08:00", false))
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Format(FormatError::EndBeforeStart { .. })
    ));

    let err = ledger
        .add_entry(&RawEntry::shift("01-03-2024", "Acme", "08:00", "08:20", true))
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Format(FormatError::BreakExceedsShift { .. })
    ));

    let err = ledger
        .add_entry(&RawEntry::shift("01-03-2024", "Acme", "8.00", "16:00", false))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Format(FormatError::InvalidTime(_))));
    assert!(ledger.is_empty());
}

#[test]
fn records_of_the_other_shape_are_rejected() {
    let mut ledger = Ledger::new(Variant::ShiftTimes);
    let err = ledger
        .add_record(Record::hours("01-03-2024", "Acme", "1").unwrap())
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::ShapeMismatch {
            expected: Variant::ShiftTimes,
            found: Variant::ElapsedHours,
        }
    );
}

#[test]
fn header_is_not_part_of_undo_history() {
    let mut ledger = hours_ledger(&[("01-03-2024", "Acme", "1")]);
    ledger.set_header("Mars");
    assert!(ledger.undo());
    assert_eq!(ledger.header(), "Mars");
    ledger.clear_header();
    assert_eq!(ledger.header(), "");
}

#[test]
fn overflowing_second_entry_fails_cleanly() {
    let max = "79228162514264337593543950335";
    let mut ledger = Ledger::new(Variant::ElapsedHours);
    ledger
        .add_entry(&RawEntry::hours("01-03-2024", "Acme", max))
        .unwrap();

    let err = ledger
        .add_entry(&RawEntry::hours("02-03-2024", "Acme", max))
        .unwrap_err();
    assert_eq!(err, LedgerError::TotalOverflow);
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.history_len(), 1);
    assert_eq!(ledger.running_total(), ledger.total_duration());

    ledger
        .add_entry(&RawEntry::hours("03-03-2024", "Acme", "0"))
        .unwrap();
    assert_eq!(ledger.len(), 2);
}
