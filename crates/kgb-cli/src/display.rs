//! Terminal rendering for roster lists and record detail cards.
//!
//! Detail cards group fields into the same sections as the record form:
//! employee, previous increment, new increment, and letter details.

use std::fmt::Write;

use chrono::NaiveDate;
use kgb_core::{KgbRecord, RecordDefect, Roster, Status, classify, format_currency, format_date};
use serde_json::{Value, json};

type Field = fn(&KgbRecord) -> String;

// ── Card sections ──

const PEGAWAI: &[(&str, Field)] = &[
    ("Nama", |r| r.nama.clone()),
    ("NIP", |r| r.nip.clone()),
    ("Pangkat", |r| r.pangkat.clone()),
    ("Golongan", |r| r.gol.clone()),
];

const KGB_LAMA: &[(&str, Field)] = &[
    ("TMT", |r| format_date(&r.tmt_lama)),
    ("Gaji Pokok", |r| format_currency(Some(r.gaji_pokok_lama.as_str()))),
    ("Masa Kerja", |r| r.masa_kerja_lama.clone()),
];

const KGB_BARU: &[(&str, Field)] = &[
    ("TMT", |r| format_date(&r.tmt_baru)),
    ("Gaji Pokok", |r| format_currency(Some(r.gaji_pokok_baru.as_str()))),
    ("Masa Kerja", |r| r.masa_kerja_baru.clone()),
    ("KGB Berikutnya", |r| format_date(&r.kgb_berikutnya)),
];

const SURAT: &[(&str, Field)] = &[
    ("Nomor Surat", |r| r.nomor_surat.clone()),
    ("Tanggal Surat", |r| format_date(&r.tanggal_surat)),
    ("Oleh Pejabat", |r| r.oleh_pejabat.clone()),
    ("Satuan Kerja", |r| r.satker.clone()),
];

pub const NOT_FOUND: &str = "Data KGB tidak ditemukan";

// ── Public API ──

/// Render one record as a vertical card grouped by section.
pub fn render_card(record: &KgbRecord, today: NaiveDate) -> String {
    let status = classify(record, today);
    let mut out = String::new();

    let _ = writeln!(out, "=== {} ===", record.nama);
    let _ = writeln!(out, "{}", status_tag(status));
    out.push('\n');

    render_section(&mut out, record, "Informasi Pegawai", PEGAWAI);
    render_section(&mut out, record, "KGB Lama", KGB_LAMA);
    render_section(&mut out, record, "KGB Baru", KGB_BARU);
    render_section(&mut out, record, "Informasi Surat", SURAT);

    if !record.extra.is_empty() {
        let _ = writeln!(out, "── Lainnya ──");
        let width = label_width(record.extra.keys().map(String::as_str));
        for (label, value) in &record.extra {
            let _ = writeln!(out, "  {label:<width$}  {}", dash_if_empty(value));
        }
    }
    out
}

/// Render a list view: one line per record, in the order given.
pub fn render_list(records: &[&KgbRecord], today: NaiveDate) -> String {
    let mut out = String::new();
    if records.is_empty() {
        out.push_str("(tidak ada data)\n");
        return out;
    }

    let name_width = label_width(records.iter().map(|r| r.nama.as_str()));
    let nip_width = label_width(records.iter().map(|r| r.nip.as_str()));
    for record in records {
        let status = classify(record, today);
        let _ = writeln!(
            out,
            "{:>4}  {:<name_width$}  {:<nip_width$}  {:<14}  KGB TMT Baru: {}",
            record.no,
            record.nama,
            record.nip,
            status_tag(status),
            format_date(&record.tmt_baru),
        );
    }
    out
}

/// One-line summary of per-status counts.
pub fn render_counts(counts: &[(Status, usize)]) -> String {
    counts
        .iter()
        .map(|(status, n)| format!("{}: {n}", status.label()))
        .collect::<Vec<_>>()
        .join("  |  ")
}

pub fn render_defects(defects: &[RecordDefect]) -> String {
    let mut out = String::new();
    for defect in defects {
        let _ = writeln!(out, "  - {defect}");
    }
    out
}

/// Machine-readable list view: each record with its status key, label and
/// display colour, plus the day the roster order was computed for.
pub fn render_json(roster: &Roster, records: &[&KgbRecord], today: NaiveDate) -> Value {
    let rows: Vec<Value> = records
        .iter()
        .map(|record| {
            let status = classify(record, today);
            let mut row = serde_json::to_value(record).unwrap_or_else(|_| json!({}));
            if let Value::Object(map) = &mut row {
                map.insert("status".into(), status.key().into());
                map.insert("statusLabel".into(), status.label().into());
                map.insert("statusColor".into(), status.color().into());
            }
            row
        })
        .collect();

    json!({
        "loadedOn": roster.loaded_on().map(|d| d.format("%Y-%m-%d").to_string()),
        "records": rows,
    })
}

// ── Helpers ──

fn render_section(out: &mut String, record: &KgbRecord, title: &str, fields: &[(&str, Field)]) {
    let _ = writeln!(out, "── {title} ──");
    let width = label_width(fields.iter().map(|(label, _)| *label));
    for (label, field) in fields {
        let _ = writeln!(out, "  {label:<width$}  {}", dash_if_empty(&field(record)));
    }
    out.push('\n');
}

fn status_tag(status: Status) -> String {
    format!("[{}]", status.label())
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0)
}

fn dash_if_empty(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}
