//! Date interpretation for facility and payment records
//!
//! Recorded dates arrive in several shapes: `DD/MM/YYYY` text (sometimes with a
//! trailing time of day), ISO-style text, spreadsheet serial day counts, or
//! nothing at all. Every input resolves to a [`ParsedDate`]; nothing here
//! returns an error.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Serial values beyond this many days from the epoch are rejected
const MAX_SERIAL_DAYS: f64 = 2_958_465.0;

/// Smallest bare number in a text cell read as a serial date (18/05/1927).
/// Smaller numbers, such as a year typed on its own, are not dates.
const MIN_TEXT_SERIAL_DAYS: f64 = 10_000.0;

/// Text forms tried when the value is not a `d/m/yyyy` string
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%B %d %Y",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A raw date value as it comes out of a record or spreadsheet cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateInput<'a> {
    /// Free text
    Text(&'a str),
    /// Spreadsheet serial day count (1 = 31 December 1899)
    Serial(f64),
    /// Absent or null
    Empty,
}

impl<'a> DateInput<'a> {
    /// Interpret a spreadsheet cell
    ///
    /// A cell holding only a number from 10000 up to the serial limit is a
    /// serial date, a blank cell is empty, and anything else is text. Cells
    /// that arrive typed as numbers (workbook cells) use `Serial` directly.
    pub fn from_cell(cell: &'a str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(days) if (MIN_TEXT_SERIAL_DAYS..=MAX_SERIAL_DAYS).contains(&days) => {
                Self::Serial(days)
            }
            _ => Self::Text(cell),
        }
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text.as_str())
    }
}

impl<'a> From<Option<&'a str>> for DateInput<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Empty, Self::Text)
    }
}

impl From<f64> for DateInput<'_> {
    fn from(days: f64) -> Self {
        Self::Serial(days)
    }
}

impl From<i64> for DateInput<'_> {
    fn from(days: i64) -> Self {
        Self::Serial(days as f64)
    }
}

/// Outcome of interpreting a date value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParsedDate {
    /// A calendar date (no time of day)
    Date(NaiveDate),
    /// Nothing was recorded
    Missing,
    /// Something was recorded but it is not a real calendar date
    Unparseable,
}

impl ParsedDate {
    /// The calendar date, if one was resolved
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn is_unparseable(&self) -> bool {
        matches!(self, Self::Unparseable)
    }
}

/// How the first two fields of a `a/b/yyyy` string are assigned
///
/// The two orders disagree for values like `03/04/2024`; they are kept
/// separate on purpose and selected explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// Always `DD/MM/YYYY`
    #[default]
    DayFirst,
    /// A field above 12 is the day; when both are 12 or less, `M/D/YYYY`
    Elimination,
}

impl fmt::Display for DateOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DayFirst => write!(f, "day-first"),
            Self::Elimination => write!(f, "elimination"),
        }
    }
}

impl FromStr for DateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "day-first" | "dmy" => Ok(Self::DayFirst),
            "elimination" => Ok(Self::Elimination),
            other => Err(format!(
                "Unknown date order '{}' (expected day-first or elimination)",
                other
            )),
        }
    }
}

/// Parse a date value using the primary `DD/MM/YYYY` order
pub fn parse_date<'a>(value: impl Into<DateInput<'a>>) -> ParsedDate {
    parse_date_with(value, DateOrder::DayFirst)
}

/// Parse a date value with an explicit day/month order
pub fn parse_date_with<'a>(value: impl Into<DateInput<'a>>, order: DateOrder) -> ParsedDate {
    match value.into() {
        DateInput::Empty => ParsedDate::Missing,
        DateInput::Serial(days) => from_serial(days),
        DateInput::Text(text) => parse_text(text, order),
    }
}

/// The day before serial date 1
pub fn serial_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// Convert a spreadsheet serial day count into a calendar date
///
/// Fractional days carry a time of day and are floored. Zero and negative
/// counts land on or before the epoch.
pub fn from_serial(days: f64) -> ParsedDate {
    if !days.is_finite() || days.abs() > MAX_SERIAL_DAYS {
        return ParsedDate::Unparseable;
    }
    let Some(epoch) = serial_epoch() else {
        return ParsedDate::Unparseable;
    };

    let offset = days.floor() as i64;
    let shifted = if offset >= 0 {
        epoch.checked_add_days(Days::new(offset.unsigned_abs()))
    } else {
        epoch.checked_sub_days(Days::new(offset.unsigned_abs()))
    };

    shifted
        .filter(|date| (0..=9999).contains(&date.year()))
        .map_or(ParsedDate::Unparseable, ParsedDate::Date)
}

/// Format a date as `DD/MM/YYYY` for spreadsheet and CSV output
///
/// Only years 0 to 9999 read back through `parse_date`; chrono writes other
/// years with a sign. Text and serial parsing reject dates outside that
/// range, so every stored or exported date round-trips.
pub fn serialize_date_for_export(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Canonical text for a date cell being written to the record store
///
/// Resolvable dates are rewritten as `DD/MM/YYYY`; unresolvable text is kept
/// as entered so classification can apply its fallback later. Blank cells
/// yield `None`.
pub fn normalize_date_cell(cell: &str, order: DateOrder) -> Option<String> {
    match parse_date_with(DateInput::from_cell(cell), order) {
        ParsedDate::Date(date) => Some(serialize_date_for_export(date)),
        ParsedDate::Missing => None,
        ParsedDate::Unparseable => {
            tracing::warn!(value = cell.trim(), "keeping unparseable date as entered");
            Some(cell.trim().to_string())
        }
    }
}

fn parse_text(text: &str, order: DateOrder) -> ParsedDate {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ParsedDate::Missing;
    }

    // A time of day may follow the date ("9/9/2026 0:00")
    let head = trimmed.split_whitespace().next().unwrap_or(trimmed);
    if let Some(fields) = slash_fields(head) {
        return resolve_slashed(fields, order);
    }

    // Signed ISO years ("+10000-01-01") parse, but cannot be written back
    parse_generic(trimmed)
        .filter(|date| (0..=9999).contains(&date.year()))
        .map_or(ParsedDate::Unparseable, ParsedDate::Date)
}

/// Split `a/b/yyyy` into its numeric fields; `None` if the shape differs
fn slash_fields(text: &str) -> Option<[u32; 3]> {
    let mut parts = text.split('/');
    let first = parts.next()?;
    let second = parts.next()?;
    let year = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    if !is_digits(first, 1, 2) || !is_digits(second, 1, 2) || !is_digits(year, 4, 4) {
        return None;
    }

    Some([first.parse().ok()?, second.parse().ok()?, year.parse().ok()?])
}

fn is_digits(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

fn resolve_slashed([first, second, year]: [u32; 3], order: DateOrder) -> ParsedDate {
    let (day, month) = match order {
        DateOrder::DayFirst => (first, second),
        DateOrder::Elimination => {
            if first > 12 {
                (first, second)
            } else {
                (second, first)
            }
        }
    };

    // from_ymd_opt rejects anything that would not round-trip (31/02, 0/5, 5/13)
    i32::try_from(year)
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, month, day))
        .map_or(ParsedDate::Unparseable, ParsedDate::Date)
}

fn parse_generic(text: &str) -> Option<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(datetime.date());
        }
    }

    // ISO date followed by some other time suffix
    let head = text.split_whitespace().next()?;
    if head != text {
        for format in &DATE_FORMATS[..3] {
            if let Ok(date) = NaiveDate::parse_from_str(head, format) {
                return Some(date);
            }
        }
    }

    None
}
