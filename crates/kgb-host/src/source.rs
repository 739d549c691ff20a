//! Roster data sources.

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use kgb_core::KgbRecord;

/// Anything that can produce a fresh roster snapshot.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch(&self) -> anyhow::Result<Vec<KgbRecord>>;
}

#[cfg(feature = "http")]
#[async_trait]
impl RosterSource for kgb_sync::SheetClient {
    async fn fetch(&self) -> anyhow::Result<Vec<KgbRecord>> {
        Ok(self.fetch_records().await?)
    }
}

/// A CSV export saved to disk.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RosterSource for CsvFileSource {
    async fn fetch(&self) -> anyhow::Result<Vec<KgbRecord>> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        Ok(kgb_sync::parse_roster_csv(&text)?)
    }
}
