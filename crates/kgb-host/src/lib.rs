//! Reminder host: evaluates the roster on a schedule and posts a reminder
//! when employees become due for their salary increment.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod notify;
pub mod runtime;
pub mod source;

#[cfg(test)]
mod testing;

pub use config::{HostConfig, UnparsedPolicy};
pub use error::HostError;
pub use evaluator::{EvalOutcome, ReminderEvaluator, due_records};
pub use notify::{LogNotifier, Notification, NotificationTarget, Notifier, Permission, compose};
pub use runtime::{ReminderHandle, initialize, run_guarded, setup_notifications};
pub use source::{CsvFileSource, RosterSource};
