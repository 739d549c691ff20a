//! Pending-notification snapshot shared between the evaluator and the store.

use serde::{Deserialize, Serialize};

use crate::record::KgbRecord;

/// One due employee, as persisted for the notification step.
///
/// Serialized with the sheet's field names: `{nama, nip, kgbBerikutnya, no}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingNotification {
    pub nama: String,
    pub nip: String,
    pub kgb_berikutnya: String,
    /// Record number; `None` in snapshots written before it was tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<String>,
}

impl From<&KgbRecord> for PendingNotification {
    fn from(record: &KgbRecord) -> Self {
        Self {
            nama: record.nama.clone(),
            nip: record.nip.clone(),
            kgb_berikutnya: record.kgb_berikutnya.clone(),
            no: Some(record.no.clone()),
        }
    }
}

/// Encode a snapshot as the JSON array stored under the pending key.
pub fn encode_snapshot(entries: &[PendingNotification]) -> Result<String, serde_json::Error> {
    serde_json::to_string(entries)
}

pub fn decode_snapshot(json: &str) -> Result<Vec<PendingNotification>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_record_copies_notification_fields() {
        let record = KgbRecord {
            no: "7".into(),
            nama: "Budi".into(),
            nip: "123".into(),
            kgb_berikutnya: "01/08/2027".into(),
            pangkat: "Penata".into(),
            ..Default::default()
        };
        let entry = PendingNotification::from(&record);
        assert_eq!(entry.nama, "Budi");
        assert_eq!(entry.nip, "123");
        assert_eq!(entry.kgb_berikutnya, "01/08/2027");
        assert_eq!(entry.no.as_deref(), Some("7"));
    }

    #[test]
    fn json_shape_uses_sheet_field_names() {
        let entries = vec![PendingNotification {
            nama: "Budi".into(),
            nip: "123".into(),
            kgb_berikutnya: "01/08/2027".into(),
            no: Some("7".into()),
        }];
        let json = encode_snapshot(&entries).unwrap();
        assert_eq!(
            json,
            r#"[{"nama":"Budi","nip":"123","kgbBerikutnya":"01/08/2027","no":"7"}]"#
        );
    }

    #[test]
    fn decodes_legacy_entries_without_number() {
        let json = r#"[{"nama":"Siti","nip":"456","kgbBerikutnya":""}]"#;
        let parsed = decode_snapshot(json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].no.is_none());
    }
}
