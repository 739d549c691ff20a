//! Loose date parsing for spreadsheet-sourced date cells.
//!
//! Cells arrive as free text in one of three shapes:
//!
//! - `DD/MM/YYYY` (e.g. "1/4/2024", "01/04/2024")
//! - `DD-MM-YYYY` (e.g. "01-04-2024")
//! - `DD <Bulan> YYYY` with an Indonesian month name in any case
//!   (e.g. "01 April 2024", "7 DESEMBER 2023")
//!
//! Anything else, including empty cells, falls back to "today". The fallback
//! is visible through [`ParsedDate::Fallback`] so callers that care can tell a
//! real date apart from a formatting defect.

use std::sync::LazyLock;

use chrono::{Datelike, Duration, Local, NaiveDate};
use regex::Regex;

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})[/\-]([0-9]{1,2})[/\-]([0-9]{4})$").expect("valid regex")
});

static TEXTUAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})\s+([A-Za-z]+)\s+([0-9]{4})$").expect("valid regex")
});

/// Indonesian month names, index = zero-based month.
pub const MONTH_NAMES: [&str; 12] = [
    "januari",
    "februari",
    "maret",
    "april",
    "mei",
    "juni",
    "juli",
    "agustus",
    "september",
    "oktober",
    "november",
    "desember",
];

/// Outcome of parsing a date cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDate {
    /// The text matched a known format.
    Parsed(NaiveDate),
    /// The text was empty or unrecognised; carries the "today" that was substituted.
    Fallback(NaiveDate),
}

impl ParsedDate {
    /// The concrete calendar date, whether parsed or substituted.
    pub fn date(self) -> NaiveDate {
        match self {
            ParsedDate::Parsed(d) | ParsedDate::Fallback(d) => d,
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, ParsedDate::Fallback(_))
    }
}

/// The local calendar date right now.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a date cell, substituting `today` when the text is empty or unrecognised.
pub fn parse_date(text: &str, today: NaiveDate) -> ParsedDate {
    let clean = text.trim();
    if clean.is_empty() {
        return ParsedDate::Fallback(today);
    }

    if let Some(caps) = NUMERIC.captures(clean) {
        let day: i64 = caps[1].parse().unwrap_or(0);
        let month: i64 = caps[2].parse().unwrap_or(0);
        let year: i32 = caps[3].parse().unwrap_or(0);
        if let Some(date) = calendar_date(year, month - 1, day) {
            return ParsedDate::Parsed(date);
        }
    }

    if let Some(caps) = TEXTUAL.captures(clean) {
        let month_name = caps[2].to_lowercase();
        if let Some(month) = MONTH_NAMES.iter().position(|m| *m == month_name) {
            let day: i64 = caps[1].parse().unwrap_or(0);
            let year: i32 = caps[3].parse().unwrap_or(0);
            if let Some(date) = calendar_date(year, month as i64, day) {
                return ParsedDate::Parsed(date);
            }
        }
    }

    tracing::debug!(input = clean, "unrecognised date format, using today");
    ParsedDate::Fallback(today)
}

/// Parse a date cell against the local clock. Never fails; see [`parse_date`].
pub fn parse_date_or_today(text: &str) -> NaiveDate {
    parse_date(text, today()).date()
}

/// Build a date from a (year, zero-based month, day) triple, rolling
/// out-of-range months and days over into neighbouring months and years.
/// "31/02/2024" becomes 2 March 2024; day 0 is the last day of the previous month.
fn calendar_date(year: i32, month0: i64, day: i64) -> Option<NaiveDate> {
    let year = year.checked_add(i32::try_from(month0.div_euclid(12)).ok()?)?;
    let month = u32::try_from(month0.rem_euclid(12)).ok()? + 1;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_signed(Duration::days(day - 1))
}

/// Format a date in the long Indonesian form, e.g. "1 April 2024".
pub fn format_long(date: NaiveDate) -> String {
    let name = MONTH_NAMES[date.month0() as usize];
    let mut chars = name.chars();
    let month = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{} {} {}", date.day(), month, date.year())
}
