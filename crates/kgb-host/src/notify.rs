//! Notification content and the delivery seam.

use async_trait::async_trait;
use kgb_core::PendingNotification;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const NOTIFICATION_TITLE: &str = "Pengingat KGB";

/// Where tapping the notification should lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum NotificationTarget {
    /// Detail view of one record, by record number.
    Detail {
        #[serde(rename = "employeeId")]
        employee_id: String,
    },
    /// The roster list.
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub target: NotificationTarget,
}

/// Build the reminder for a set of due employees; `None` when the set is empty.
///
/// One employee is named with their NIP and deep-links to their record;
/// more than one gets a count and opens the list.
pub fn compose(entries: &[PendingNotification]) -> Option<Notification> {
    let (body, target) = match entries {
        [] => return None,
        [one] => (
            format!("{} ({}) waktunya KGB", one.nama, one.nip),
            match &one.no {
                Some(no) if !no.trim().is_empty() => NotificationTarget::Detail {
                    employee_id: no.clone(),
                },
                _ => NotificationTarget::List,
            },
        ),
        many => (
            format!("Ada {} pegawai yang waktunya KGB", many.len()),
            NotificationTarget::List,
        ),
    };
    Some(Notification {
        title: NOTIFICATION_TITLE.to_string(),
        body,
        target,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Device notification scheduler.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Ask for (or report) permission to post notifications.
    async fn request_permission(&self) -> anyhow::Result<Permission> {
        Ok(Permission::Granted)
    }

    /// Post `notification` immediately.
    async fn schedule(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Delivers notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn schedule(&self, notification: &Notification) -> anyhow::Result<()> {
        info!(
            title = %notification.title,
            body = %notification.body,
            target = ?notification.target,
            "notification"
        );
        Ok(())
    }
}
