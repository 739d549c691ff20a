//! The fetched roster: base priority order, lookup, and filtered views.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::record::{KgbRecord, RecordDefect, ingest};
use crate::status::{ParseStatusError, Status, classify};

/// Which statuses a list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn accepts(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "semua" | "all" => Ok(StatusFilter::All),
            other => other.parse::<Status>().map(StatusFilter::Only),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("semua"),
            StatusFilter::Only(status) => f.write_str(status.key()),
        }
    }
}

/// A roster snapshot, held in base priority order.
///
/// The order is fixed when the roster is loaded (overdue, then due, then
/// upcoming, fetch order kept within each block). Filtering never re-sorts,
/// so a list does not reshuffle while a query is typed.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    records: Vec<KgbRecord>,
    defects: Vec<RecordDefect>,
    loaded_on: Option<NaiveDate>,
}

impl Roster {
    /// Validate and order freshly fetched records as of `today`.
    pub fn load(records: Vec<KgbRecord>, today: NaiveDate) -> Self {
        let (mut records, defects) = ingest(records, today);
        // `sort_by_key` is stable, which keeps fetch order inside a block.
        records.sort_by_key(|r| classify(r, today).priority());
        tracing::debug!(records = records.len(), %today, "roster loaded");
        Self {
            records,
            defects,
            loaded_on: Some(today),
        }
    }

    pub fn records(&self) -> &[KgbRecord] {
        &self.records
    }

    pub fn defects(&self) -> &[RecordDefect] {
        &self.defects
    }

    /// The day the base order was computed for.
    pub fn loaded_on(&self) -> Option<NaiveDate> {
        self.loaded_on
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look a record up by its record number. The first match wins.
    pub fn find(&self, no: &str) -> Option<&KgbRecord> {
        let no = no.trim();
        self.records.iter().find(|r| r.no.trim() == no)
    }

    /// Visible subset for a query and filter, in base order.
    ///
    /// Status is re-derived against `today` so the filter tracks the clock,
    /// while the base order stays as it was at load time.
    pub fn select(&self, query: &str, filter: StatusFilter, today: NaiveDate) -> Vec<&KgbRecord> {
        select(&self.records, query, filter, today)
    }

    /// Record count per status as of `today`, in priority order.
    pub fn counts(&self, today: NaiveDate) -> [(Status, usize); 3] {
        let mut counts = Status::ALL.map(|s| (s, 0));
        for record in &self.records {
            let status = classify(record, today);
            counts[status.priority() as usize].1 += 1;
        }
        counts
    }
}

/// Free-function form of [`Roster::select`] over any slice already in base order.
pub fn select<'a>(
    records: &'a [KgbRecord],
    query: &str,
    filter: StatusFilter,
    today: NaiveDate,
) -> Vec<&'a KgbRecord> {
    records
        .iter()
        .filter(|r| filter.accepts(classify(r, today)))
        .filter(|r| r.matches_query(query))
        .collect()
}
