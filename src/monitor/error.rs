//! Error types for the monitor layer.

use crate::watcher::WatcherError;
use thiserror::Error;

/// Error type for starting a monitor.
///
/// Start-time failures propagate synchronously to the caller; once `start`
/// has returned, runtime faults travel the diagnostic path instead (see
/// [`MonitorFault`]).
#[derive(Debug, Error)]
pub enum StartError {
    /// Failed to spawn a worker thread.
    #[error("failed to spawn monitor thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Terminal fault recorded by a running monitor.
///
/// Faults never reach the change-event callback, whose contract is
/// "no payload, change occurred". They are logged when they happen and
/// held for the consumer to collect via
/// [`MonitorHandle::stop`](super::MonitorHandle::stop) or probe via
/// [`MonitorHandle::fault_observed`](super::MonitorHandle::fault_observed).
#[derive(Debug, Error)]
pub enum MonitorFault {
    /// The watcher could not open a subscription; monitoring never became
    /// active.
    #[error("failed to open change subscription: {0}")]
    Open(#[source] WatcherError),

    /// The watcher failed mid-session; monitoring stopped permanently.
    #[error("change subscription failed: {0}")]
    Wait(#[source] WatcherError),
}
