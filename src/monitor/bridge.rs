//! Event bridge between the monitor thread and the consumer callback.
//!
//! The bridge is an unbounded FIFO channel plus a dedicated delivery
//! thread. The monitor thread posts fire-and-forget events; the delivery
//! thread drains them in enqueue order and invokes the registered callback
//! once per event. The callback therefore never runs on the monitor thread
//! and never runs concurrently with itself.

use super::event::ChangeEvent;
use std::sync::mpsc;
use std::thread::JoinHandle;

/// Name of the delivery thread, visible in debuggers and panic messages.
const DELIVERY_THREAD_NAME: &str = "netwake-deliver";

/// Sending half of the event bridge, owned by the monitor loop.
pub(crate) struct EventBridge {
    sender: mpsc::Sender<ChangeEvent>,
}

/// Creates the bridge channel.
///
/// The receiving half is handed to [`spawn_delivery`] once the monitor
/// thread is up; until then, posted events queue in order.
pub(crate) fn channel() -> (EventBridge, mpsc::Receiver<ChangeEvent>) {
    let (sender, receiver) = mpsc::channel();
    (EventBridge { sender }, receiver)
}

impl EventBridge {
    /// Enqueues one event for delivery.
    ///
    /// Best-effort: if the delivery side is already torn down the event is
    /// dropped silently. The only information conveyed is "something
    /// changed", and a fresh monitor re-scans at startup anyway.
    pub(crate) fn post(&self, event: ChangeEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("delivery context gone, dropping change event");
        }
    }
}

/// Spawns the delivery thread.
///
/// The thread drains the channel in FIFO order, invoking `callback` once
/// per event, and exits when every sender is gone and the queue is empty.
pub(crate) fn spawn_delivery<F>(
    receiver: mpsc::Receiver<ChangeEvent>,
    mut callback: F,
) -> std::io::Result<JoinHandle<()>>
where
    F: FnMut() + Send + 'static,
{
    std::thread::Builder::new()
        .name(DELIVERY_THREAD_NAME.into())
        .spawn(move || {
            while receiver.recv().is_ok() {
                callback();
            }
            tracing::debug!("event bridge drained, delivery thread exiting");
        })
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
