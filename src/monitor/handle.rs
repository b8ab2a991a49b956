//! Monitor lifecycle: start, handle, stop.

use super::bridge;
use super::error::{MonitorFault, StartError};
use super::event::ChangeEvent;
use super::worker;
use crate::cancel::CancelToken;
use crate::watcher::Watcher;
use crate::watcher::platform::PlatformWatcher;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

/// Name of the monitor thread, visible in debuggers and panic messages.
const MONITOR_THREAD_NAME: &str = "netwake-monitor";

/// Starts monitoring with the platform's default watcher.
///
/// Returns immediately: no OS call runs on the calling thread. The
/// callback is invoked once per detected change, plus one synthetic
/// startup invocation that always arrives first, so consumers can do
/// their initial scan without a separate first-run path.
///
/// Each call creates an independent monitor with its own watcher, bridge,
/// and threads; any number may coexist in one process.
///
/// # Errors
///
/// Returns [`StartError::Spawn`] if a worker thread cannot be created.
/// Platform problems (including an unsupported OS) are not start errors:
/// they surface through the handle's diagnostic path after start.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let handle = netwake::monitor::start(|| {
///     println!("network changed, re-scan interfaces");
/// })?;
///
/// // ... later: clean shutdown, joining both background threads.
/// handle.stop()?;
/// # Ok(())
/// # }
/// ```
pub fn start<F>(callback: F) -> Result<MonitorHandle, StartError>
where
    F: FnMut() + Send + 'static,
{
    start_with(PlatformWatcher::default(), callback)
}

/// Starts monitoring with an explicit watcher.
///
/// This is the injection point for tests and alternative backends; see
/// [`start`] for the delivery contract.
///
/// # Errors
///
/// Returns [`StartError::Spawn`] if a worker thread cannot be created.
pub fn start_with<W, F>(watcher: W, callback: F) -> Result<MonitorHandle, StartError>
where
    W: Watcher,
    F: FnMut() + Send + 'static,
{
    let cancel = CancelToken::new();
    let faults = FaultSlot::default();

    let (events, receiver) = bridge::channel();

    // The synthetic startup event is queued before the monitor thread
    // exists, so it is always the first delivery.
    events.post(ChangeEvent);

    let monitor_thread = {
        let cancel = cancel.clone();
        let faults = faults.clone();
        std::thread::Builder::new()
            .name(MONITOR_THREAD_NAME.into())
            .spawn(move || worker::run(watcher, events, cancel, faults))?
    };

    let delivery_thread = match bridge::spawn_delivery(receiver, callback) {
        Ok(thread) => thread,
        Err(err) => {
            // The monitor thread is already running; wind it back down so
            // the failed start leaves nothing behind. The receiver is gone,
            // so no event (startup included) is ever delivered.
            cancel.cancel();
            let _ = monitor_thread.join();
            return Err(err.into());
        }
    };

    Ok(MonitorHandle {
        cancel,
        faults,
        monitor_thread,
        delivery_thread,
    })
}

/// Owning handle for one running monitor.
///
/// Dropping the handle without calling [`stop`](Self::stop) detaches the
/// background threads: monitoring continues until the process exits, which
/// suits start-and-forget consumers. Call `stop` for a clean, joined
/// shutdown.
#[derive(Debug)]
pub struct MonitorHandle {
    cancel: CancelToken,
    faults: FaultSlot,
    monitor_thread: JoinHandle<()>,
    delivery_thread: JoinHandle<()>,
}

impl MonitorHandle {
    /// Stops the monitor and joins both background threads.
    ///
    /// Cancellation unblocks a pending OS wait; events already queued are
    /// still delivered before the delivery thread exits.
    ///
    /// # Errors
    ///
    /// Returns the terminal fault if the watcher failed at open time or
    /// mid-session; `Ok(())` after a clean shutdown.
    pub fn stop(self) -> Result<(), MonitorFault> {
        let Self {
            cancel,
            faults,
            monitor_thread,
            delivery_thread,
        } = self;

        cancel.cancel();
        if monitor_thread.join().is_err() {
            tracing::error!("monitor thread panicked during shutdown");
        }
        // The monitor thread dropped its bridge sender on exit; the
        // delivery thread drains the queue and follows.
        if delivery_thread.join().is_err() {
            tracing::error!("delivery thread panicked during shutdown");
        }

        faults.take().map_or(Ok(()), Err)
    }

    /// Returns true while the monitor thread is alive.
    ///
    /// A monitor that hit a terminal fault stops on its own; this turning
    /// false without a `stop` call means the watcher gave up.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.monitor_thread.is_finished()
    }

    /// Returns true once a terminal fault has been recorded.
    ///
    /// This is the optional out-of-band diagnostic probe; the fault itself
    /// is collected by [`stop`](Self::stop).
    #[must_use]
    pub fn fault_observed(&self) -> bool {
        self.faults.has_fault()
    }
}

/// Shared slot holding the first terminal fault of a monitor.
///
/// Written once by the monitor thread, read from the handle. Later faults
/// cannot occur: the loop exits on the first one.
#[derive(Clone, Debug, Default)]
pub(crate) struct FaultSlot {
    inner: Arc<Mutex<Option<MonitorFault>>>,
}

impl FaultSlot {
    pub(crate) fn record(&self, fault: MonitorFault) {
        let mut slot = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(fault);
        }
    }

    pub(crate) fn has_fault(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub(crate) fn take(&self) -> Option<MonitorFault> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
