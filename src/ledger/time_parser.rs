use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::FormatError;

pub const DATE_FORMAT: &str = "%d-%m-%Y";
pub const TIME_FORMAT: &str = "%H:%M";
pub const BREAK_MINUTES: u32 = 30;

/// Parses a strict `DD-MM-YYYY` calendar date.
///
/// The input must be exactly what formatting the parsed date produces, so
/// single-digit days, signed years and trailing text are rejected.
pub fn parse_date(text: &str) -> Result<NaiveDate, FormatError> {
    let invalid = || FormatError::InvalidDate(text.to_string());
    let date = NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| invalid())?;
    if date.format(DATE_FORMAT).to_string() != text {
        return Err(invalid());
    }
    Ok(date)
}

/// Parses a 24-hour time of day, `HH:MM` or `H:MM`.
pub fn parse_time_of_day(text: &str) -> Result<NaiveTime, FormatError> {
    let invalid = || FormatError::InvalidTime(text.to_string());
    let (hours, minutes) = text.split_once(':').ok_or_else(invalid)?;
    let well_formed = matches!(hours.len(), 1 | 2)
        && minutes.len() == 2
        && hours.chars().chain(minutes.chars()).all(|ch| ch.is_ascii_digit());
    if !well_formed {
        return Err(invalid());
    }
    NaiveTime::parse_from_str(text, TIME_FORMAT).map_err(|_| invalid())
}

/// Elapsed minutes between `start` and `end`, minus the fixed break.
///
/// Shifts never wrap past midnight: an end before the start is an error, as
/// is a break longer than the shift itself.
pub fn duration_minutes(
    start: NaiveTime,
    end: NaiveTime,
    took_break: bool,
) -> Result<u32, FormatError> {
    if end < start {
        return Err(FormatError::EndBeforeStart { start, end });
    }
    let shift_minutes = minutes_of_day(end) - minutes_of_day(start);
    if !took_break {
        return Ok(shift_minutes);
    }
    shift_minutes
        .checked_sub(BREAK_MINUTES)
        .ok_or(FormatError::BreakExceedsShift {
            shift_minutes,
            break_minutes: BREAK_MINUTES,
        })
}

/// Parses a non-negative decimal number of hours such as `7.5`.
pub fn parse_hours_duration(text: &str) -> Result<Decimal, FormatError> {
    let trimmed = text.trim();
    let hours = Decimal::from_str(trimmed)
        .map_err(|_| FormatError::InvalidHours(text.to_string()))?;
    if hours.is_sign_negative() && !hours.is_zero() {
        return Err(FormatError::NegativeHours(text.to_string()));
    }
    Ok(hours)
}

/// Renders minutes as `H:MM`.
pub fn format_duration(minutes: u64) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

/// Renders decimal hours with two decimal places.
pub fn format_hours(hours: Decimal) -> String {
    let mut rounded = hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(text: &str) -> NaiveTime {
        parse_time_of_day(text).unwrap()
    }

    #[test]
    fn date_round_trips_through_format() {
        for text in ["01-01-2024", "29-02-2024", "31-12-1999"] {
            let date = parse_date(text).unwrap();
            assert_eq!(date.format(DATE_FORMAT).to_string(), text);
        }
    }

    #[test]
    fn date_rejects_loose_or_impossible_input() {
        for text in [
            "1-01-2024",
            "01-1-2024",
            "2024-01-01",
            "30-02-2024",
            "01-13-2024",
            "01-01-24",
            " 01-01-2024",
            "01-01-2024x",
            "",
        ] {
            assert_eq!(
                parse_date(text),
                Err(FormatError::InvalidDate(text.to_string())),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn time_accepts_one_or_two_digit_hours() {
        assert_eq!(time("7:05"), NaiveTime::from_hms_opt(7, 5, 0).unwrap());
        assert_eq!(time("07:05"), NaiveTime::from_hms_opt(7, 5, 0).unwrap());
        assert_eq!(time("23:59"), NaiveTime::from_hms_opt(23, 59, 0).unwrap());
    }

    #[test]
    fn time_rejects_malformed_input() {
        for text in ["24:00", "12:60", "12:5", "1205", "ab:cd", "12:05:00", ""] {
            assert!(parse_time_of_day(text).is_err(), "{text:?} should fail");
        }
    }

    #[test]
    fn break_subtracts_thirty_minutes() {
        let start = time("08:00");
        let end = time("16:15");
        let without = duration_minutes(start, end, false).unwrap();
        let with = duration_minutes(start, end, true).unwrap();
        assert_eq!(without, 495);
        assert_eq!(with, without - BREAK_MINUTES);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = duration_minutes(time("17:00"), time("08:00"), false).unwrap_err();
        assert!(matches!(err, FormatError::EndBeforeStart { .. }));
    }

    #[test]
    fn break_longer_than_shift_is_rejected() {
        let err = duration_minutes(time("08:00"), time("08:20"), true).unwrap_err();
        assert_eq!(
            err,
            FormatError::BreakExceedsShift {
                shift_minutes: 20,
                break_minutes: 30
            }
        );
        assert_eq!(duration_minutes(time("08:00"), time("08:30"), true), Ok(0));
    }

    #[test]
    fn hours_parse_decimal_text() {
        assert_eq!(parse_hours_duration("2.5").unwrap(), Decimal::new(25, 1));
        assert_eq!(parse_hours_duration(" 8 ").unwrap(), Decimal::new(8, 0));
        assert!(matches!(
            parse_hours_duration("eight"),
            Err(FormatError::InvalidHours(_))
        ));
        assert!(matches!(
            parse_hours_duration("-1"),
            Err(FormatError::NegativeHours(_))
        ));
    }

    #[test]
    fn durations_render_with_padded_minutes() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(600), "10:00");
        assert_eq!(format_hours(Decimal::new(4, 0)), "4.00");
        assert_eq!(format_hours(Decimal::new(12345, 3)), "12.35");
    }
}
