//! Monitor loop running on the dedicated background thread.

use super::bridge::EventBridge;
use super::error::MonitorFault;
use super::event::ChangeEvent;
use super::handle::FaultSlot;
use crate::cancel::CancelToken;
use crate::watcher::{Subscription, Wake, Watcher};

/// Runs the monitor loop until cancellation or a terminal watcher error.
///
/// Opens one subscription, then alternates between blocking on the next
/// change and posting one event per wake. There is no backoff and no rate
/// limiting: OS change notifications are already rate-limited by real
/// network events.
///
/// Terminal errors are recorded in `faults` and logged; they never travel
/// through the bridge. The subscription is released when the loop exits.
pub(crate) fn run<W: Watcher>(
    watcher: W,
    bridge: EventBridge,
    cancel: CancelToken,
    faults: FaultSlot,
) {
    let mut subscription = match watcher.open(cancel) {
        Ok(subscription) => subscription,
        Err(err) => {
            tracing::error!("failed to open network change subscription: {err}");
            faults.record(MonitorFault::Open(err));
            return;
        }
    };

    tracing::debug!("network change subscription active");

    loop {
        match subscription.wait() {
            Ok(Wake::Changed) => {
                bridge.post(ChangeEvent);
            }
            Ok(Wake::Cancelled) => {
                tracing::debug!("monitor cancelled, releasing subscription");
                break;
            }
            Err(err) => {
                tracing::error!("network change subscription failed: {err}");
                faults.record(MonitorFault::Wait(err));
                break;
            }
        }
    }
    // Dropping the subscription here closes the OS handle.
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
