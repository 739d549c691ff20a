//! Reminder evaluation: fetch, classify, persist the due set, notify.

use std::sync::Arc;

use chrono::NaiveDate;
use kgb_core::{KgbRecord, PendingNotification, Status, classify_tagged};
use kgb_store::{KvStore, load_pending, save_pending};
use tracing::{error, info, warn};

use crate::config::UnparsedPolicy;
use crate::error::HostError;
use crate::notify::{Notification, Notifier, compose};
use crate::source::RosterSource;

/// Result reported back to the scheduler after one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalOutcome {
    /// Due records were found and a reminder was posted.
    NewData(usize),
    /// Nothing due, or the saved snapshot could not be read back.
    NoData,
    Failed,
}

/// Records classified as due on `today` under `policy`, in roster order.
pub fn due_records(
    records: &[KgbRecord],
    today: NaiveDate,
    policy: UnparsedPolicy,
) -> Vec<&KgbRecord> {
    records
        .iter()
        .filter(|r| {
            let (status, target) = classify_tagged(r, today);
            status == Status::Due && !(policy == UnparsedPolicy::Exclude && target.is_fallback())
        })
        .collect()
}

pub struct ReminderEvaluator {
    source: Arc<dyn RosterSource>,
    store: Arc<dyn KvStore>,
    notifier: Arc<dyn Notifier>,
    unparsed: UnparsedPolicy,
}

impl ReminderEvaluator {
    pub fn new(
        source: Arc<dyn RosterSource>,
        store: Arc<dyn KvStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            source,
            store,
            notifier,
            unparsed: UnparsedPolicy::default(),
        }
    }

    pub fn with_unparsed_policy(mut self, policy: UnparsedPolicy) -> Self {
        self.unparsed = policy;
        self
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Fetch the roster and persist the due set.
    ///
    /// Returns how many records are due. An empty due set leaves the stored
    /// snapshot alone. A failed snapshot write is logged and counts as zero.
    pub async fn check_for_due(&self, today: NaiveDate) -> Result<usize, HostError> {
        let records = self.source.fetch().await.map_err(HostError::Fetch)?;
        let due: Vec<PendingNotification> = due_records(&records, today, self.unparsed)
            .into_iter()
            .map(PendingNotification::from)
            .collect();

        info!(records = records.len(), due = due.len(), %today, "roster evaluated");
        if due.is_empty() {
            return Ok(0);
        }

        if let Err(e) = save_pending(self.store.as_ref(), &due).await {
            warn!(error = %e, "could not save pending snapshot; skipping reminder");
            return Ok(0);
        }
        Ok(due.len())
    }

    /// Read the saved snapshot back and post the reminder for it.
    ///
    /// Returns the notification that was posted, if any. An unreadable
    /// snapshot is logged and treated as nothing to send.
    pub async fn send_notification(&self) -> Result<Option<Notification>, HostError> {
        let entries = match load_pending(self.store.as_ref()).await {
            Ok(Some(entries)) => entries,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!(error = %e, "could not read pending snapshot");
                return Ok(None);
            }
        };

        let Some(notification) = compose(&entries) else {
            return Ok(None);
        };
        self.notifier
            .schedule(&notification)
            .await
            .map_err(HostError::Notify)?;
        info!(count = entries.len(), body = %notification.body, "reminder scheduled");
        Ok(Some(notification))
    }

    /// One full evaluation as of `today`. Never returns an error: every
    /// failure is logged and reported as [`EvalOutcome::Failed`].
    pub async fn evaluate(&self, today: NaiveDate) -> EvalOutcome {
        let due = match self.check_for_due(today).await {
            Ok(0) => return EvalOutcome::NoData,
            Ok(n) => n,
            Err(e) => {
                error!(error = %e, "reminder evaluation failed");
                return EvalOutcome::Failed;
            }
        };

        match self.send_notification().await {
            Ok(Some(_)) => EvalOutcome::NewData(due),
            Ok(None) => EvalOutcome::NoData,
            Err(e) => {
                error!(error = %e, "reminder evaluation failed");
                EvalOutcome::Failed
            }
        }
    }

    /// [`evaluate`](Self::evaluate) against the local clock.
    pub async fn run_once(&self) -> EvalOutcome {
        self.evaluate(kgb_core::today()).await
    }
}
