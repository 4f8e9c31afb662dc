//! Timesheet records, time parsing, and the undoable in-memory ledger.

pub mod history;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod record;
pub mod time_parser;

pub use history::{History, UndoPolicy};
pub use ledger::Ledger;
pub use record::{RawEntry, RawWork, Record, Shift, Total, Variant, WorkTime};
pub use time_parser::{
    duration_minutes, format_duration, format_hours, parse_date, parse_hours_duration,
    parse_time_of_day,
};
