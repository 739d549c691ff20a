//! Test doubles for the host seams.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use kgb_core::KgbRecord;
use kgb_store::{KvStore, StoreError};

use crate::notify::{Notification, Notifier, Permission};
use crate::source::RosterSource;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

pub fn record(no: &str, nama: &str, nip: &str, offset_days: i64) -> KgbRecord {
    KgbRecord {
        no: no.into(),
        nama: nama.into(),
        nip: nip.into(),
        tmt_baru: (today() + chrono::Duration::days(offset_days))
            .format("%d/%m/%Y")
            .to_string(),
        kgb_berikutnya: "01/01/2030".into(),
        ..Default::default()
    }
}

/// Serves a fixed roster and counts fetches.
#[derive(Default)]
pub struct StaticSource {
    pub records: Vec<KgbRecord>,
    pub fetches: AtomicUsize,
}

impl StaticSource {
    pub fn new(records: Vec<KgbRecord>) -> Self {
        Self {
            records,
            fetches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RosterSource for StaticSource {
    async fn fetch(&self) -> anyhow::Result<Vec<KgbRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.clone())
    }
}

pub struct FailingSource;

#[async_trait]
impl RosterSource for FailingSource {
    async fn fetch(&self) -> anyhow::Result<Vec<KgbRecord>> {
        anyhow::bail!("connection refused")
    }
}

pub struct SlowSource(pub Duration);

#[async_trait]
impl RosterSource for SlowSource {
    async fn fetch(&self) -> anyhow::Result<Vec<KgbRecord>> {
        tokio::time::sleep(self.0).await;
        Ok(Vec::new())
    }
}

pub struct PanickingSource;

#[async_trait]
impl RosterSource for PanickingSource {
    async fn fetch(&self) -> anyhow::Result<Vec<KgbRecord>> {
        panic!("source blew up")
    }
}

/// Store whose every operation fails.
pub struct BrokenStore;

#[async_trait]
impl KvStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Other("disk unavailable".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Other("disk unavailable".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Other("disk unavailable".into()))
    }
}

/// Store that accepts writes but cannot read anything back.
#[derive(Default)]
pub struct WriteOnlyStore {
    pub writes: AtomicUsize,
}

#[async_trait]
impl KvStore for WriteOnlyStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Other("read failed".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Keeps every scheduled notification.
pub struct RecordingNotifier {
    pub permission: Permission,
    pub fail: bool,
    pub sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            permission: Permission::Granted,
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: Permission::Denied,
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn request_permission(&self) -> anyhow::Result<Permission> {
        Ok(self.permission)
    }

    async fn schedule(&self, notification: &Notification) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("scheduler rejected notification");
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}
