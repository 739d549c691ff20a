//! Three-state KGB status derived from the new-increment date.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::date::ParsedDate;
use crate::record::KgbRecord;

/// Days ahead (inclusive) in which an increment counts as due.
pub const DUE_WINDOW_DAYS: i64 = 60;

/// Status of a record relative to "today". Derived, never stored.
///
/// Variant order is priority order: overdue first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "terlambat")]
    Overdue,
    #[serde(rename = "waktunya")]
    Due,
    #[serde(rename = "akan_datang")]
    Upcoming,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Overdue, Status::Due, Status::Upcoming];

    /// Sort priority: overdue 0, due 1, upcoming 2.
    pub fn priority(self) -> u8 {
        match self {
            Status::Overdue => 0,
            Status::Due => 1,
            Status::Upcoming => 2,
        }
    }

    /// Stable key used in filters and serialized payloads.
    pub fn key(self) -> &'static str {
        match self {
            Status::Overdue => "terlambat",
            Status::Due => "waktunya",
            Status::Upcoming => "akan_datang",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Overdue => "Terlambat",
            Status::Due => "Waktunya KGB",
            Status::Upcoming => "Akan Datang",
        }
    }

    /// Display colour as a hex string.
    pub fn color(self) -> &'static str {
        match self {
            Status::Overdue => "#F44336",
            Status::Due => "#FFC107",
            Status::Upcoming => "#2196F3",
        }
    }

    /// Classify by whole calendar days between `today` and `target`.
    pub fn from_days(diff_days: i64) -> Self {
        if diff_days < 0 {
            Status::Overdue
        } else if diff_days <= DUE_WINDOW_DAYS {
            Status::Due
        } else {
            Status::Upcoming
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown status {0:?} (expected semua, terlambat, waktunya or akan_datang)")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "terlambat" | "overdue" => Ok(Status::Overdue),
            "waktunya" | "due" => Ok(Status::Due),
            "akan_datang" | "upcoming" => Ok(Status::Upcoming),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Status of a target date as seen from `today`.
pub fn classify_date(target: NaiveDate, today: NaiveDate) -> Status {
    Status::from_days((target - today).num_days())
}

/// Status of a record as seen from `today`, using the documented
/// fallback-to-today policy for unparseable dates.
pub fn classify(record: &KgbRecord, today: NaiveDate) -> Status {
    classify_date(record.target_date(today).date(), today)
}

/// Like [`classify`], but also reports whether the date was substituted.
pub fn classify_tagged(record: &KgbRecord, today: NaiveDate) -> (Status, ParsedDate) {
    let target = record.target_date(today);
    (classify_date(target.date(), today), target)
}
