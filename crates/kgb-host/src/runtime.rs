//! Explicit start-up and the recurring evaluation schedule.
//!
//! Nothing registers itself at load time: the host calls [`initialize`] once,
//! gets a [`ReminderHandle`] back, and owns the schedule through it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::config::HostConfig;
use crate::error::HostError;
use crate::evaluator::{EvalOutcome, ReminderEvaluator};
use crate::notify::Permission;

/// Ask the notifier for permission to post.
///
/// Returns `Ok(true)` when granted. A denial is an error, except on a
/// degraded host where it is logged and reported as `Ok(false)`.
pub async fn setup_notifications(
    evaluator: &ReminderEvaluator,
    config: &HostConfig,
) -> Result<bool, HostError> {
    let permission = match evaluator.notifier().request_permission().await {
        Ok(p) => p,
        Err(e) if config.degraded => {
            warn!(error = %e, "notification permission check unavailable");
            return Ok(false);
        }
        Err(e) => return Err(HostError::Notify(e)),
    };

    match permission {
        Permission::Granted => Ok(true),
        Permission::Denied if config.degraded => {
            warn!("notification permission denied; reminders disabled on this host");
            Ok(false)
        }
        Permission::Denied => Err(HostError::PermissionDenied),
    }
}

/// Set up notifications and start the recurring evaluation.
///
/// Returns `Ok(None)` when a degraded host cannot post notifications; no
/// schedule is started in that case. A zero interval is rejected before
/// permission is requested.
pub async fn initialize(
    config: HostConfig,
    evaluator: ReminderEvaluator,
) -> Result<Option<ReminderHandle>, HostError> {
    if config.interval.is_zero() {
        return Err(HostError::ZeroInterval);
    }
    if !setup_notifications(&evaluator, &config).await? {
        return Ok(None);
    }
    ReminderHandle::start(config, Arc::new(evaluator)).map(Some)
}

/// Owns a running schedule. Dropping the handle stops it.
pub struct ReminderHandle {
    stop: watch::Sender<bool>,
    outcomes: watch::Receiver<Option<EvalOutcome>>,
    task: Option<JoinHandle<()>>,
}

impl ReminderHandle {
    /// Start evaluating every `config.interval`, first run immediately.
    /// Evaluations never overlap: the next tick waits for the current one.
    pub fn start(
        config: HostConfig,
        evaluator: Arc<ReminderEvaluator>,
    ) -> Result<Self, HostError> {
        if config.interval.is_zero() {
            return Err(HostError::ZeroInterval);
        }
        let (stop, stop_rx) = watch::channel(false);
        let (outcome_tx, outcomes) = watch::channel(None);

        info!(interval = ?config.interval, "reminder schedule started");
        let task = tokio::spawn(run_schedule(config, evaluator, stop_rx, outcome_tx));

        Ok(Self {
            stop,
            outcomes,
            task: Some(task),
        })
    }

    /// Outcome of the most recent evaluation, if one has finished.
    pub fn last_outcome(&self) -> Option<EvalOutcome> {
        *self.outcomes.borrow()
    }

    /// Watch evaluation outcomes as they arrive.
    pub fn subscribe(&self) -> watch::Receiver<Option<EvalOutcome>> {
        self.outcomes.clone()
    }

    /// Stop the schedule and wait for an in-flight evaluation to finish.
    pub async fn shutdown(mut self) {
        let _ = self.stop.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!(error = %e, "reminder schedule ended abnormally");
            }
        }
        info!("reminder schedule stopped");
    }
}

impl Drop for ReminderHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_schedule(
    config: HostConfig,
    evaluator: Arc<ReminderEvaluator>,
    mut stop: watch::Receiver<bool>,
    outcomes: watch::Sender<Option<EvalOutcome>>,
) {
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = stop.changed() => break,
        }
        if *stop.borrow() {
            break;
        }

        let outcome = run_guarded(evaluator.clone(), config.evaluation_timeout).await;
        info!(?outcome, "background evaluation finished");
        outcomes.send_replace(Some(outcome));
    }
}

/// Run one evaluation in its own task so a panic or a hang cannot take the
/// schedule down with it.
pub async fn run_guarded(
    evaluator: Arc<ReminderEvaluator>,
    timeout: Option<Duration>,
) -> EvalOutcome {
    let task = tokio::spawn(async move { evaluator.run_once().await });
    let abort = task.abort_handle();

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined,
            Err(_) => {
                abort.abort();
                error!(error = %HostError::Timeout(limit), "reminder evaluation failed");
                return EvalOutcome::Failed;
            }
        },
        None => task.await,
    };

    joined.unwrap_or_else(|e| {
        error!(error = %e, "reminder evaluation task panicked");
        EvalOutcome::Failed
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use kgb_store::MemoryStore;
    use std::sync::atomic::Ordering;

    fn config(interval_ms: u64) -> HostConfig {
        HostConfig {
            interval: Duration::from_millis(interval_ms),
            ..HostConfig::default()
        }
    }

    #[tokio::test]
    async fn denied_permission_is_an_error() {
        let eval = ReminderEvaluator::new(
            Arc::new(StaticSource::default()),
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingNotifier::denied()),
        );
        let result = initialize(config(10), eval).await;
        assert!(matches!(result, Err(HostError::PermissionDenied)));
    }

    #[tokio::test]
    async fn degraded_host_downgrades_denial() {
        let eval = ReminderEvaluator::new(
            Arc::new(StaticSource::default()),
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingNotifier::denied()),
        );
        let cfg = HostConfig {
            degraded: true,
            ..config(10)
        };
        assert!(!setup_notifications(&eval, &cfg).await.unwrap());
        assert!(initialize(cfg, eval).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn zero_interval_is_rejected() {
        let source = Arc::new(StaticSource::new(vec![record("7", "Budi", "123", 30)]));
        let notifier = Arc::new(RecordingNotifier::new());
        let eval = ReminderEvaluator::new(
            source.clone(),
            Arc::new(MemoryStore::new()),
            notifier.clone(),
        );

        let result = initialize(config(0), eval).await;
        assert!(matches!(result, Err(HostError::ZeroInterval)));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
        assert!(notifier.sent().is_empty());

        let eval = ReminderEvaluator::new(
            source,
            Arc::new(MemoryStore::new()),
            notifier,
        );
        assert!(matches!(
            ReminderHandle::start(config(0), Arc::new(eval)),
            Err(HostError::ZeroInterval)
        ));
    }

    #[tokio::test]
    async fn schedule_runs_repeatedly_until_shutdown() {
        let source = Arc::new(StaticSource::new(vec![record("7", "Budi", "123", 30)]));
        let notifier = Arc::new(RecordingNotifier::new());
        let eval = ReminderEvaluator::new(
            source.clone(),
            Arc::new(MemoryStore::new()),
            notifier.clone(),
        );

        let handle = initialize(config(20), eval).await.unwrap().unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(handle.last_outcome(), Some(EvalOutcome::NewData(1)));
        handle.shutdown().await;

        let runs = source.fetches.load(Ordering::SeqCst);
        assert!(runs >= 2, "expected repeated evaluations, got {runs}");
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(source.fetches.load(Ordering::SeqCst), runs);
        assert_eq!(notifier.sent().len(), runs);
    }

    #[tokio::test]
    async fn timeout_reports_failure() {
        let eval = ReminderEvaluator::new(
            Arc::new(SlowSource(Duration::from_secs(5))),
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingNotifier::new()),
        );
        let outcome = run_guarded(Arc::new(eval), Some(Duration::from_millis(50))).await;
        assert_eq!(outcome, EvalOutcome::Failed);
    }

    #[tokio::test]
    async fn panic_is_contained() {
        let eval = ReminderEvaluator::new(
            Arc::new(PanickingSource),
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingNotifier::new()),
        );
        let eval = Arc::new(eval);
        assert_eq!(run_guarded(eval.clone(), None).await, EvalOutcome::Failed);
        // The host keeps going and can evaluate again.
        assert_eq!(run_guarded(eval, None).await, EvalOutcome::Failed);
    }

    #[tokio::test]
    async fn failed_evaluations_do_not_stop_the_schedule() {
        let eval = ReminderEvaluator::new(
            Arc::new(FailingSource),
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingNotifier::new()),
        );
        let handle = ReminderHandle::start(config(20), Arc::new(eval)).unwrap();
        let mut outcomes = handle.subscribe();
        outcomes.changed().await.unwrap();
        assert_eq!(*outcomes.borrow(), Some(EvalOutcome::Failed));
        outcomes.changed().await.unwrap();
        assert_eq!(*outcomes.borrow(), Some(EvalOutcome::Failed));
        handle.shutdown().await;
    }
}
