//! Async adapter: change events as a tokio stream.
//!
//! The core delivery mechanism is callback-based; tokio consumers usually
//! want a [`Stream`] they can `select!` on instead. The adapter registers a
//! callback that forwards each delivery into an unbounded tokio channel and
//! exposes the receiving half as a stream.

use crate::monitor::{ChangeEvent, MonitorHandle, StartError, start_with};
use crate::watcher::Watcher;
use crate::watcher::platform::PlatformWatcher;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc as tokio_mpsc;
use tokio_stream::Stream;

/// Starts monitoring with the platform's default watcher, delivering
/// events as a stream.
///
/// The stream yields one [`ChangeEvent`] per delivery, startup event
/// included, in delivery order. It ends (yields `None`) once the monitor
/// has stopped and every queued event has been drained.
///
/// # Errors
///
/// Returns [`StartError::Spawn`] if a worker thread cannot be created.
pub fn start_stream() -> Result<(MonitorHandle, EventStream), StartError> {
    start_stream_with(PlatformWatcher::default())
}

/// Starts monitoring with an explicit watcher, delivering events as a
/// stream. See [`start_stream`].
///
/// # Errors
///
/// Returns [`StartError::Spawn`] if a worker thread cannot be created.
pub fn start_stream_with<W: Watcher>(
    watcher: W,
) -> Result<(MonitorHandle, EventStream), StartError> {
    let (sender, receiver) = tokio_mpsc::unbounded_channel();

    // The delivery thread owns the callback, and with it the sender; when
    // the monitor stops, the sender drops and the stream ends.
    let handle = start_with(watcher, move || {
        let _ = sender.send(ChangeEvent);
    })?;

    Ok((handle, EventStream { receiver }))
}

/// Stream of change events from a running monitor.
#[derive(Debug)]
pub struct EventStream {
    receiver: tokio_mpsc::UnboundedReceiver<ChangeEvent>,
}

impl Stream for EventStream {
    type Item = ChangeEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
