//! CSV export decoding.

use kgb_core::KgbRecord;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SyncError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// Decode a CSV export with a header row into records.
///
/// Headers are mapped to field names; unknown columns are carried in
/// [`KgbRecord::extra`]. Blank lines and rows whose cells are all empty are
/// skipped, and short or long rows are tolerated.
pub fn parse_roster_csv(text: &str) -> Result<Vec<KgbRecord>, SyncError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let cells: Vec<&str> = row.iter().collect();
        records.push(KgbRecord::from_row(&headers, &cells));
    }

    debug!(rows = records.len(), columns = headers.len(), "decoded roster CSV");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
NO,NAMA,NIP,PANGKAT,GOL,TMT KGB BARU,GAJI POKOK BARU,KGB BERIKUTNYA,NOMOR_SRT,Satker,KETERANGAN
1,Budi Santoso,198001012005011001,Penata,III/c,01/08/2025,\"3.500.000\",01/08/2027,800/12/2025,BNN Kota,
2,Siti Aminah,198505052010012002,Penata Muda,III/a,15 Januari 2026,2900000,15/01/2028,800/13/2025,BNN Kota,mutasi

";

    #[test]
    fn maps_headers_and_values() {
        let records = parse_roster_csv(SAMPLE).unwrap();
        assert_eq!(records.len(), 2);

        let budi = &records[0];
        assert_eq!(budi.no, "1");
        assert_eq!(budi.nama, "Budi Santoso");
        assert_eq!(budi.gol, "III/c");
        assert_eq!(budi.tmt_baru, "01/08/2025");
        assert_eq!(budi.gaji_pokok_baru, "3.500.000");
        assert_eq!(budi.nomor_surat, "800/12/2025");
        assert_eq!(budi.satker, "BNN Kota");

        let siti = &records[1];
        assert_eq!(siti.tmt_baru, "15 Januari 2026");
        assert_eq!(siti.extra.get("KETERANGAN").map(String::as_str), Some("mutasi"));
    }

    #[test]
    fn skips_blank_rows() {
        let csv = "NO,NAMA\n1,Budi\n,\n\n2,Siti\n";
        let records = parse_roster_csv(csv).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.nama.as_str()).collect();
        assert_eq!(names, vec!["Budi", "Siti"]);
    }

    #[test]
    fn tolerates_ragged_rows() {
        let csv = "NO,NAMA,NIP\n1,Budi\n2,Siti,456,extra\n";
        let records = parse_roster_csv(csv).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].nip.is_empty());
        assert_eq!(records[1].nip, "456");
    }

    #[test]
    fn strips_byte_order_mark() {
        let csv = "\u{feff}NO,NAMA\n1,Budi\n";
        let records = parse_roster_csv(csv).unwrap();
        assert_eq!(records[0].no, "1");
    }

    #[test]
    fn header_only_is_empty_roster() {
        assert!(parse_roster_csv("NO,NAMA,NIP\n").unwrap().is_empty());
    }
}
