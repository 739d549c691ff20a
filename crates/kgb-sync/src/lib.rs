//! Roster sync: pulls the spreadsheet's CSV export and maps rows onto records.

pub mod sheet;

#[cfg(feature = "http")]
pub mod http;

pub use sheet::{SyncError, parse_roster_csv};

#[cfg(feature = "http")]
pub use http::{SheetClient, export_url};
