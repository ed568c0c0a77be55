//! Time-of-day, duration, and date normalization for command-line input.

use std::sync::LazyLock;

use chrono::{Local, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone};
use regex::Regex;
use thiserror::Error;

static TIME_HMS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}:[0-9]{2}$").unwrap());
static TIME_HM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}$").unwrap());
static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([0-9]+)([hms])$").unwrap());

/// Errors raised while normalizing user input, before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid time format: {value}. Use HH:MM or HH:MM:SS.")]
    InvalidTime { value: String },

    #[error("Invalid duration: {value}. Use seconds or 1h/30m/45s format.")]
    InvalidDuration { value: String },

    #[error("Invalid date: {value}. Use YYYY-MM-DD.")]
    InvalidDate { value: String },

    #[error("Unable to parse start/end time for duration.")]
    UnparseableRange,

    #[error("End time must be after start time.")]
    EndBeforeStart,
}

/// Normalizes `HH:MM` or `HH:MM:SS` to `HH:MM:SS`.
///
/// Only the shape is checked here; [`compute_duration_seconds`] rejects
/// out-of-range values such as `25:00`.
pub fn normalize_time(value: &str) -> Result<String, InputError> {
    if TIME_HMS_RE.is_match(value) {
        return Ok(value.to_string());
    }
    if TIME_HM_RE.is_match(value) {
        return Ok(format!("{value}:00"));
    }
    Err(InputError::InvalidTime {
        value: value.to_string(),
    })
}

/// Parses a duration given as bare seconds or `<n>h`, `<n>m`, `<n>s`.
pub fn parse_duration_seconds(value: &str) -> Result<u64, InputError> {
    let invalid = || InputError::InvalidDuration {
        value: value.to_string(),
    };
    let raw = value.trim();

    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse().map_err(|_| invalid());
    }

    let caps = DURATION_RE.captures(raw).ok_or_else(invalid)?;
    let amount: u64 = caps[1].parse().map_err(|_| invalid())?;
    let multiplier = match caps[2].to_ascii_lowercase().as_str() {
        "h" => 3600,
        "m" => 60,
        _ => 1,
    };
    amount.checked_mul(multiplier).ok_or_else(invalid)
}

/// Seconds between two times of day on `date`, in local time.
///
/// Both times must already be normalized to `HH:MM:SS`.
pub fn compute_duration_seconds(
    date: &str,
    start_time: &str,
    end_time: &str,
) -> Result<u64, InputError> {
    duration_in(&Local, date, start_time, end_time)
}

fn duration_in<Tz: TimeZone>(
    tz: &Tz,
    date: &str,
    start_time: &str,
    end_time: &str,
) -> Result<u64, InputError> {
    let start = wall_clock_millis(tz, date, start_time).ok_or(InputError::UnparseableRange)?;
    let end = wall_clock_millis(tz, date, end_time).ok_or(InputError::UnparseableRange)?;
    let diff = end - start;
    if diff < 0 {
        return Err(InputError::EndBeforeStart);
    }
    u64::try_from(diff / 1000).map_err(|_| InputError::UnparseableRange)
}

fn wall_clock_millis<Tz: TimeZone>(tz: &Tz, date: &str, time: &str) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(&format!("{date}T{time}"), "%Y-%m-%dT%H:%M:%S").ok()?;
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.timestamp_millis()),
        // Skipped by a forward transition: read with the offset in effect
        // before the gap, which lands the same distance past it.
        LocalResult::None => {
            let before = tz
                .from_local_datetime(&(naive - TimeDelta::hours(3)))
                .earliest()?;
            let offset = before.offset().fix();
            offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.timestamp_millis())
        }
    }
}

/// Checks that `value` is a calendar date in `YYYY-MM-DD` form.
pub fn validate_date(value: &str) -> Result<String, InputError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| InputError::InvalidDate {
            value: value.to_string(),
        })
}

/// Today's local calendar date as `YYYY-MM-DD`.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// The current local time as `YYYY-MM-DD HH:MM:SS`.
pub fn local_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
