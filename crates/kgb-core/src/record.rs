//! KGB roster records as they come off the spreadsheet.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::{ParsedDate, parse_date};

/// One employee's salary-increment case.
///
/// Fields stay textual: the upstream sheet is untyped and cells may be empty
/// or malformed. Typed views are exposed through accessor methods, and
/// [`ingest`] reports the defects found at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KgbRecord {
    /// Record number, the lookup key for detail views and notification deep-links.
    pub no: String,
    pub nama: String,
    /// National civil-service employee ID.
    pub nip: String,
    pub pangkat: String,
    pub gol: String,
    pub tempat_lahir: String,
    pub tanggal_lahir: String,
    pub tmt_lama: String,
    pub gaji_pokok_lama: String,
    pub masa_kerja_lama: String,
    /// Effective date of the new increment; drives status classification.
    pub tmt_baru: String,
    pub gaji_pokok_baru: String,
    pub masa_kerja_baru: String,
    pub kgb_berikutnya: String,
    pub oleh_pejabat: String,
    pub nomor_surat: String,
    pub tanggal_surat: String,
    pub tembusan: String,
    pub tembusan1: String,
    pub satker: String,
    pub di: String,
    /// Columns with no known mapping, keyed by their original header text.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Sheet header label to record field name.
const HEADER_MAP: &[(&str, &str)] = &[
    ("NO", "no"),
    ("NAMA", "nama"),
    ("NIP", "nip"),
    ("PANGKAT", "pangkat"),
    ("GOL", "gol"),
    ("TMP LAHIR", "tempatLahir"),
    ("TGL LAHIR", "tanggalLahir"),
    ("TMT KGB LAMA/PANGKAT", "tmtLama"),
    ("GAJI POKOK LAMA", "gajiPokokLama"),
    ("MASA KERJA LAMA", "masaKerjaLama"),
    ("TMT KGB BARU", "tmtBaru"),
    ("GAJI POKOK BARU", "gajiPokokBaru"),
    ("MASA KERJA BARU", "masaKerjaBaru"),
    ("KGB BERIKUTNYA", "kgbBerikutnya"),
    ("OLEH PEJABAT", "olehPejabat"),
    ("NOMOR_SRT", "nomorSurat"),
    ("TGL", "tanggalSurat"),
    ("TEMBUSAN", "tembusan"),
    ("TEMBUSAN_1", "tembusan1"),
    ("Satker", "satker"),
    ("di", "di"),
];

/// Map a sheet header to its field name. Unknown headers pass through unchanged.
pub fn map_header(header: &str) -> &str {
    HEADER_MAP
        .iter()
        .find(|(label, _)| *label == header)
        .map(|(_, field)| *field)
        .unwrap_or(header)
}

impl KgbRecord {
    /// Build a record from a header row and one data row.
    ///
    /// Headers go through [`map_header`]; missing trailing cells are empty.
    pub fn from_row<H, C>(headers: &[H], cells: &[C]) -> Self
    where
        H: AsRef<str>,
        C: AsRef<str>,
    {
        let mut record = KgbRecord::default();
        for (i, header) in headers.iter().enumerate() {
            let value = cells.get(i).map(|c| c.as_ref()).unwrap_or_default();
            record.set(map_header(header.as_ref()), value);
        }
        record
    }

    /// Assign a field by its mapped name; unknown names land in `extra`.
    pub fn set(&mut self, field: &str, value: &str) {
        let value = value.to_string();
        match field {
            "no" => self.no = value,
            "nama" => self.nama = value,
            "nip" => self.nip = value,
            "pangkat" => self.pangkat = value,
            "gol" => self.gol = value,
            "tempatLahir" => self.tempat_lahir = value,
            "tanggalLahir" => self.tanggal_lahir = value,
            "tmtLama" => self.tmt_lama = value,
            "gajiPokokLama" => self.gaji_pokok_lama = value,
            "masaKerjaLama" => self.masa_kerja_lama = value,
            "tmtBaru" => self.tmt_baru = value,
            "gajiPokokBaru" => self.gaji_pokok_baru = value,
            "masaKerjaBaru" => self.masa_kerja_baru = value,
            "kgbBerikutnya" => self.kgb_berikutnya = value,
            "olehPejabat" => self.oleh_pejabat = value,
            "nomorSurat" => self.nomor_surat = value,
            "tanggalSurat" => self.tanggal_surat = value,
            "tembusan" => self.tembusan = value,
            "tembusan1" => self.tembusan1 = value,
            "satker" => self.satker = value,
            "di" => self.di = value,
            other => {
                self.extra.insert(other.to_string(), value);
            }
        }
    }

    /// Target date of the new increment, tagged with whether it actually parsed.
    pub fn target_date(&self, today: NaiveDate) -> ParsedDate {
        parse_date(&self.tmt_baru, today)
    }

    /// Case-insensitive substring match against name or NIP.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.nama.to_lowercase().contains(&query) || self.nip.to_lowercase().contains(&query)
    }
}

/// A problem found in a record at ingestion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDefect {
    /// Zero-based row position in the fetched roster.
    pub row: usize,
    pub no: String,
    pub kind: DefectKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefectKind {
    MissingNumber,
    DuplicateNumber,
    MissingName,
    /// `tmtBaru` is empty or unparseable; status was derived from today instead.
    UnparsedTargetDate(String),
}

impl std::fmt::Display for RecordDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {} (no {:?}): ", self.row, self.no)?;
        match &self.kind {
            DefectKind::MissingNumber => write!(f, "missing record number"),
            DefectKind::DuplicateNumber => write!(f, "duplicate record number"),
            DefectKind::MissingName => write!(f, "missing name"),
            DefectKind::UnparsedTargetDate(text) => {
                write!(f, "unparseable TMT KGB BARU {text:?}")
            }
        }
    }
}

/// Validate a freshly fetched roster.
///
/// Every record is kept; the defect list says what is wrong with which row.
pub fn ingest(records: Vec<KgbRecord>, today: NaiveDate) -> (Vec<KgbRecord>, Vec<RecordDefect>) {
    let mut defects = Vec::new();
    let mut seen = HashSet::new();

    for (row, record) in records.iter().enumerate() {
        let mut push = |kind| {
            defects.push(RecordDefect {
                row,
                no: record.no.clone(),
                kind,
            })
        };

        let no = record.no.trim();
        if no.is_empty() {
            push(DefectKind::MissingNumber);
        } else if !seen.insert(no.to_string()) {
            push(DefectKind::DuplicateNumber);
        }
        if record.nama.trim().is_empty() {
            push(DefectKind::MissingName);
        }
        if record.target_date(today).is_fallback() {
            push(DefectKind::UnparsedTargetDate(record.tmt_baru.clone()));
        }
    }

    if !defects.is_empty() {
        tracing::warn!(
            records = records.len(),
            defects = defects.len(),
            "roster ingested with defects"
        );
    }
    (records, defects)
}
