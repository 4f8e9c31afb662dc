use std::{fmt, str::FromStr};

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::time_parser::{self, TIME_FORMAT};
use crate::errors::FormatError;

pub const BREAK_TAKEN: &str = "Ja";
pub const NO_BREAK: &str = "Nei";

/// Record shape a ledger accepts. Selects both the input fields and the
/// exported column set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Date, client/address and a decimal number of hours.
    #[default]
    ElapsedHours,
    /// Date, client/address, start and end times and a break flag.
    ShiftTimes,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::ElapsedHours, Variant::ShiftTimes];

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Variant::ElapsedHours => &["Dato", "Kunde/Adresse", "Arbeidstid"],
            Variant::ShiftTimes => &[
                "Dato",
                "Kunde/Adresse",
                "Starttid",
                "Sluttid",
                "Tok pause",
                "Arbeidstid",
            ],
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Variant::ElapsedHours => "elapsed-hours",
            Variant::ShiftTimes => "shift-times",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "elapsed-hours" | "hours" | "a" => Ok(Variant::ElapsedHours),
            "shift-times" | "shift" | "b" => Ok(Variant::ShiftTimes),
            other => Err(format!(
                "unknown record shape `{other}` (use `elapsed-hours` or `shift-times`)"
            )),
        }
    }
}

/// A start/end shift with its derived duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub took_break: bool,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkTime {
    Hours(Decimal),
    Shift(Shift),
}

/// One ledger line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Date as entered; always valid `DD-MM-YYYY`.
    pub date: String,
    pub client_address: String,
    pub work: WorkTime,
}

impl Record {
    pub fn hours(date: &str, client_address: &str, hours: &str) -> Result<Self, FormatError> {
        time_parser::parse_date(date)?;
        let hours = time_parser::parse_hours_duration(hours)?;
        Ok(Self {
            date: date.to_string(),
            client_address: client_address.to_string(),
            work: WorkTime::Hours(hours),
        })
    }

    pub fn shift(
        date: &str,
        client_address: &str,
        start: &str,
        end: &str,
        took_break: bool,
    ) -> Result<Self, FormatError> {
        time_parser::parse_date(date)?;
        let start = time_parser::parse_time_of_day(start)?;
        let end = time_parser::parse_time_of_day(end)?;
        let minutes = time_parser::duration_minutes(start, end, took_break)?;
        Ok(Self {
            date: date.to_string(),
            client_address: client_address.to_string(),
            work: WorkTime::Shift(Shift {
                start,
                end,
                took_break,
                minutes,
            }),
        })
    }

    pub fn from_raw(raw: &RawEntry) -> Result<Self, FormatError> {
        match &raw.work {
            RawWork::Hours(hours) => Self::hours(&raw.date, &raw.client_address, hours),
            RawWork::Shift {
                start,
                end,
                took_break,
            } => Self::shift(&raw.date, &raw.client_address, start, end, *took_break),
        }
    }

    pub fn variant(&self) -> Variant {
        match self.work {
            WorkTime::Hours(_) => Variant::ElapsedHours,
            WorkTime::Shift(_) => Variant::ShiftTimes,
        }
    }

    /// Display cells in the column order of [`Variant::columns`].
    pub fn cells(&self) -> Vec<String> {
        let mut cells = vec![self.date.clone(), self.client_address.clone()];
        match &self.work {
            WorkTime::Hours(hours) => cells.push(hours.normalize().to_string()),
            WorkTime::Shift(shift) => {
                cells.push(shift.start.format(TIME_FORMAT).to_string());
                cells.push(shift.end.format(TIME_FORMAT).to_string());
                cells.push(if shift.took_break { BREAK_TAKEN } else { NO_BREAK }.to_string());
                cells.push(time_parser::format_duration(u64::from(shift.minutes)));
            }
        }
        cells
    }
}

/// Raw field strings as collected by a form, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub date: String,
    pub client_address: String,
    pub work: RawWork,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawWork {
    Hours(String),
    Shift {
        start: String,
        end: String,
        took_break: bool,
    },
}

impl RawEntry {
    pub fn hours(
        date: impl Into<String>,
        client_address: impl Into<String>,
        hours: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            client_address: client_address.into(),
            work: RawWork::Hours(hours.into()),
        }
    }

    pub fn shift(
        date: impl Into<String>,
        client_address: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        took_break: bool,
    ) -> Self {
        Self {
            date: date.into(),
            client_address: client_address.into(),
            work: RawWork::Shift {
                start: start.into(),
                end: end.into(),
                took_break,
            },
        }
    }
}

/// Sum of record durations: decimal hours or whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Total {
    Hours(Decimal),
    Minutes(u64),
}

impl Total {
    pub fn zero(variant: Variant) -> Self {
        match variant {
            Variant::ElapsedHours => Total::Hours(Decimal::ZERO),
            Variant::ShiftTimes => Total::Minutes(0),
        }
    }

    /// Sums `records` from scratch, saturating at the numeric limit. Ledgers
    /// reject appends that overflow, so their records never reach it.
    pub fn of<'a>(variant: Variant, records: impl IntoIterator<Item = &'a Record>) -> Self {
        records
            .into_iter()
            .fold(Self::zero(variant), |total, record| total.saturating_add(record))
    }

    /// Adds a record's contribution, or `None` when the sum would overflow.
    /// Records of the other shape are skipped.
    pub fn checked_add(self, record: &Record) -> Option<Self> {
        match (self, &record.work) {
            (Total::Hours(sum), WorkTime::Hours(hours)) => sum.checked_add(*hours).map(Total::Hours),
            (Total::Minutes(sum), WorkTime::Shift(shift)) => sum
                .checked_add(u64::from(shift.minutes))
                .map(Total::Minutes),
            (total, _) => Some(total),
        }
    }

    fn saturating_add(self, record: &Record) -> Self {
        match (self, &record.work) {
            (Total::Hours(sum), WorkTime::Hours(hours)) => Total::Hours(sum.saturating_add(*hours)),
            (Total::Minutes(sum), WorkTime::Shift(shift)) => {
                Total::Minutes(sum.saturating_add(u64::from(shift.minutes)))
            }
            (total, _) => total,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Total::Hours(hours) => hours.is_zero(),
            Total::Minutes(minutes) => *minutes == 0,
        }
    }
}

impl fmt::Display for Total {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Total::Hours(hours) => f.write_str(&time_parser::format_hours(*hours)),
            Total::Minutes(minutes) => f.write_str(&time_parser::format_duration(*minutes)),
        }
    }
}
