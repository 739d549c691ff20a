use std::time::Duration;

/// Default gap between background evaluations.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// How the evaluator treats records whose target date did not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnparsedPolicy {
    /// Use the fallback date (today), so the record counts as due.
    #[default]
    Include,
    /// Leave the record out of the due set.
    Exclude,
}

/// Host-level settings for the reminder runtime.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Gap between evaluations. The first one runs at start-up.
    pub interval: Duration,
    /// Wall-clock bound per evaluation; `None` means unbounded.
    pub evaluation_timeout: Option<Duration>,
    pub unparsed: UnparsedPolicy,
    /// Notification delivery is known to be limited on this host. A denied
    /// permission is then logged rather than raised.
    pub degraded: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            evaluation_timeout: None,
            unparsed: UnparsedPolicy::Include,
            degraded: false,
        }
    }
}
