use std::{io, path::PathBuf};

use chrono::NaiveTime;
use thiserror::Error;

use crate::ledger::Variant;

/// Rejected user input. The ledger is never touched when one of these is raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Invalid date `{0}`. Use the format DD-MM-YYYY.")]
    InvalidDate(String),
    #[error("Invalid time `{0}`. Use the format HH:MM or H:MM.")]
    InvalidTime(String),
    #[error("Invalid number of hours `{0}`.")]
    InvalidHours(String),
    #[error("Working hours cannot be negative (got `{0}`).")]
    NegativeHours(String),
    #[error("End time {end} is before start time {start}.")]
    EndBeforeStart { start: NaiveTime, end: NaiveTime },
    #[error("A {break_minutes}-minute break does not fit in a {shift_minutes}-minute shift.")]
    BreakExceedsShift {
        shift_minutes: u32,
        break_minutes: u32,
    },
}

/// Failures raised by the in-memory ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("Record shape `{found}` does not match ledger shape `{expected}`.")]
    ShapeMismatch { expected: Variant, found: Variant },
    #[error("Adding this entry would overflow the total working time.")]
    TotalOverflow,
}

/// Failures writing the paginated document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Cannot write document to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot serialize document: {0}")]
    Pdf(String),
}

/// Failures converting a document into page images.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Cannot open document {}: {reason}", .path.display())]
    SourceUnreadable { path: PathBuf, reason: String },
    #[error("Output directory {} is not usable: {source}", .path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure converting a single page. Recorded per page; never aborts a batch.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Cannot read page content: {0}")]
    Content(String),
    #[error("Page of {width:.0}x{height:.0} pixels exceeds the {limit} pixel limit")]
    TooLarge { width: f64, height: f64, limit: u64 },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Failures loading or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Error type that captures every failure the core can report.
#[derive(Debug, Error)]
pub enum WorklogError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
