//! HTTP client for the roster spreadsheet's CSV export.

use std::time::Duration;

use kgb_core::KgbRecord;
use tracing::info;

use crate::sheet::{SyncError, parse_roster_csv};

/// CSV export URL for a Google Sheets document id.
pub fn export_url(sheet_id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv")
}

/// Fetches the roster from a CSV export endpoint.
#[derive(Debug, Clone)]
pub struct SheetClient {
    client: reqwest::Client,
    url: String,
}

impl SheetClient {
    /// Create a client for an explicit CSV URL.
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    /// Create a client for a Google Sheets document id.
    pub fn for_sheet(sheet_id: &str) -> Self {
        Self::new(export_url(sheet_id))
    }

    /// Bound every request by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, SyncError> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the export and decode it into records, in sheet order.
    pub async fn fetch_records(&self) -> Result<Vec<KgbRecord>, SyncError> {
        info!(url = %self.url, "fetching KGB roster");
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        let records = parse_roster_csv(&text)?;
        info!(count = records.len(), "fetched KGB roster");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn export_url_for_sheet_id() {
        assert_eq!(
            export_url("abc123"),
            "https://docs.google.com/spreadsheets/d/abc123/export?format=csv"
        );
        assert_eq!(SheetClient::for_sheet("abc123").url(), export_url("abc123"));
    }

    #[tokio::test]
    async fn fetches_and_decodes_csv() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/export"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("NO,NAMA,NIP,TMT KGB BARU\n7,Budi,123,01/08/2025\n"),
            )
            .mount(&server)
            .await;

        let client = SheetClient::new(format!("{}/export", server.uri()));
        let records = client.fetch_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].no, "7");
        assert_eq!(records[0].tmt_baru, "01/08/2025");
    }

    #[tokio::test]
    async fn non_success_status_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = SheetClient::new(server.uri());
        match client.fetch_records().await {
            Err(SyncError::Server { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "not found");
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("NO\n1\n")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = SheetClient::new(server.uri())
            .with_timeout(Duration::from_millis(100))
            .unwrap();
        assert!(matches!(
            client.fetch_records().await,
            Err(SyncError::Http(_))
        ));
    }
}
