//! Core KGB reminder logic: loose date parsing, status classification,
//! roster ordering and filtering, and the shared record and snapshot types.

pub mod date;
pub mod format;
pub mod record;
pub mod roster;
pub mod snapshot;
pub mod status;

pub use date::{ParsedDate, parse_date, parse_date_or_today, today};
pub use format::{format_currency, format_date};
pub use record::{DefectKind, KgbRecord, RecordDefect, ingest, map_header};
pub use roster::{Roster, StatusFilter, select};
pub use snapshot::{PendingNotification, decode_snapshot, encode_snapshot};
pub use status::{ParseStatusError, Status, classify, classify_date, classify_tagged};
