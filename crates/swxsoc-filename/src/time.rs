//! Time handling for file names
//!
//! Accepted inputs are a parsed [`NaiveDateTime`], strict ISO text
//! (`YYYY-MM-DDThh:mm:ss`) or a Julian date. File names carry whole
//! seconds only, so sub-second parts are dropped on input.

use crate::error::{FilenameError, FilenameResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Science convention stamp, `YYYYMMDDThhmmss`
pub const SCIENCE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Level 0 convention stamp, `YYYYDDD-hhmmss`
pub const LEVEL0_TIME_FORMAT: &str = "%Y%j-%H%M%S";

/// Julian date of the Unix epoch
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const SECONDS_PER_DAY: f64 = 86_400.0;

static ISO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})T([0-9]{2}):([0-9]{2}):([0-9]{2})$").expect("valid ISO regex")
});

static SCIENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})([0-9]{2})([0-9]{2})T([0-9]{2})([0-9]{2})([0-9]{2})$").expect("valid stamp regex")
});

static LEVEL0_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})([0-9]{3})-([0-9]{2})([0-9]{2})([0-9]{2})$").expect("valid stamp regex")
});

/// Time accepted by the file name builder
#[derive(Debug, Clone, PartialEq)]
pub enum TimeInput {
    /// Already parsed timestamp
    DateTime(NaiveDateTime),
    /// Strict ISO text, `YYYY-MM-DDThh:mm:ss`
    Iso(String),
    /// Julian date (UTC), rounded to the nearest second
    JulianDate(f64),
}

impl TimeInput {
    /// Normalize to a whole-second timestamp
    ///
    /// # Errors
    /// Returns [`FilenameError::InvalidTime`] for malformed text, impossible
    /// calendar dates, non-finite Julian dates, or years outside `0..=9999`.
    pub fn resolve(&self) -> FilenameResult<NaiveDateTime> {
        let time = match self {
            Self::DateTime(t) => t.with_nanosecond(0).unwrap_or(*t),
            Self::Iso(text) => parse_iso(text)?,
            Self::JulianDate(jd) => from_julian_date(*jd)?,
        };

        if !(0..=9999).contains(&chrono::Datelike::year(&time)) {
            return Err(FilenameError::invalid_time(
                time.to_string(),
                "year must have four digits",
            ));
        }
        Ok(time)
    }
}

impl From<NaiveDateTime> for TimeInput {
    fn from(time: NaiveDateTime) -> Self {
        Self::DateTime(time)
    }
}

impl From<DateTime<Utc>> for TimeInput {
    fn from(time: DateTime<Utc>) -> Self {
        Self::DateTime(time.naive_utc())
    }
}

impl From<&str> for TimeInput {
    fn from(text: &str) -> Self {
        Self::Iso(text.to_string())
    }
}

impl From<String> for TimeInput {
    fn from(text: String) -> Self {
        Self::Iso(text)
    }
}

impl From<f64> for TimeInput {
    fn from(jd: f64) -> Self {
        Self::JulianDate(jd)
    }
}

/// Parse strict ISO text, `YYYY-MM-DDThh:mm:ss`
///
/// # Errors
/// Returns [`FilenameError::InvalidTime`] if the text has any other shape
/// or names an impossible date or clock time.
pub fn parse_iso(text: &str) -> FilenameResult<NaiveDateTime> {
    let caps = ISO_RE
        .captures(text)
        .ok_or_else(|| FilenameError::invalid_time(text, "expected YYYY-MM-DDThh:mm:ss"))?;
    let field = |i: usize| caps[i].parse::<u32>().unwrap_or(u32::MAX);

    let date = year_month_day(text, field(1), field(2), field(3))?;
    at_clock(text, date, field(4), field(5), field(6))
}

/// Render a science convention stamp
#[must_use]
pub fn format_science(time: &NaiveDateTime) -> String {
    time.format(SCIENCE_TIME_FORMAT).to_string()
}

/// Render a level 0 convention stamp
#[must_use]
pub fn format_level0(time: &NaiveDateTime) -> String {
    time.format(LEVEL0_TIME_FORMAT).to_string()
}

/// Parse a science convention stamp, `YYYYMMDDThhmmss`
///
/// # Errors
/// Returns [`FilenameError::InvalidTime`] on shape or calendar errors.
pub fn parse_science(stamp: &str) -> FilenameResult<NaiveDateTime> {
    let caps = SCIENCE_RE
        .captures(stamp)
        .ok_or_else(|| FilenameError::invalid_time(stamp, "expected YYYYMMDDThhmmss"))?;
    let field = |i: usize| caps[i].parse::<u32>().unwrap_or(u32::MAX);

    let date = year_month_day(stamp, field(1), field(2), field(3))?;
    at_clock(stamp, date, field(4), field(5), field(6))
}

/// Parse a level 0 convention stamp, `YYYYDDD-hhmmss`
///
/// # Errors
/// Returns [`FilenameError::InvalidTime`] on shape or calendar errors.
pub fn parse_level0(stamp: &str) -> FilenameResult<NaiveDateTime> {
    let caps = LEVEL0_RE
        .captures(stamp)
        .ok_or_else(|| FilenameError::invalid_time(stamp, "expected YYYYDDD-hhmmss"))?;
    let field = |i: usize| caps[i].parse::<u32>().unwrap_or(u32::MAX);

    let year = i32::try_from(field(1)).unwrap_or(i32::MAX);
    let date = NaiveDate::from_yo_opt(year, field(2)).ok_or_else(|| {
        FilenameError::invalid_time(stamp, format!("day {} does not exist in {year}", field(2)))
    })?;
    at_clock(stamp, date, field(3), field(4), field(5))
}

fn year_month_day(text: &str, year: u32, month: u32, day: u32) -> FilenameResult<NaiveDate> {
    let year = i32::try_from(year).unwrap_or(i32::MAX);
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| FilenameError::invalid_time(text, "date does not exist"))
}

fn at_clock(
    text: &str,
    date: NaiveDate,
    hour: u32,
    minute: u32,
    second: u32,
) -> FilenameResult<NaiveDateTime> {
    date.and_hms_opt(hour, minute, second)
        .ok_or_else(|| FilenameError::invalid_time(text, "clock time does not exist"))
}

fn from_julian_date(jd: f64) -> FilenameResult<NaiveDateTime> {
    if !jd.is_finite() {
        return Err(FilenameError::invalid_time(jd.to_string(), "julian date is not finite"));
    }
    let seconds = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY).round();
    #[allow(clippy::cast_possible_truncation)]
    let seconds = seconds as i64;
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(|t| t.naive_utc())
        .ok_or_else(|| FilenameError::invalid_time(jd.to_string(), "julian date out of range"))
}
