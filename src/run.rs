//! Application execution logic.
//!
//! This module contains the async loop that consumes change events and
//! logs them until a shutdown signal, the configured event count, or a
//! terminal monitor fault ends the run.

use netwake::monitor::{MonitorFault, StartError};
use netwake::stream::{EventStream, start_stream_with};
use netwake::watcher::Watcher;
use netwake::watcher::platform::PlatformWatcher;
use thiserror::Error;
use tokio::signal;
use tokio_stream::StreamExt;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to start the monitor.
    #[error("failed to start monitor: {0}")]
    Start(#[from] StartError),

    /// The monitor ended with a terminal fault.
    #[error("monitoring stopped: {0}")]
    Monitor(#[source] MonitorFault),
}

/// Runtime options extracted from the CLI.
pub struct RuntimeOptions {
    /// Exit after this many delivered events, startup event included.
    pub count: Option<u64>,
}

/// What ended the watch loop.
#[derive(Debug, PartialEq, Eq)]
enum LoopEnd {
    /// Ctrl-C or SIGTERM.
    Shutdown,
    /// The configured event count was reached.
    CountReached,
    /// The event stream ended: the monitor stopped on its own.
    StreamEnded,
}

/// Executes the main application loop with the platform watcher.
///
/// # Errors
///
/// Returns an error if the monitor fails to start, or if it ends with a
/// terminal fault (unsupported platform included).
///
/// # Coverage Note
///
/// Excluded from coverage because it requires platform-specific network
/// APIs.
#[cfg(not(tarpaulin_include))]
pub async fn execute(options: RuntimeOptions) -> Result<(), RunError> {
    execute_with(PlatformWatcher::default(), options).await
}

/// Executes the main application loop with an explicit watcher.
///
/// # Errors
///
/// See [`execute`].
pub async fn execute_with<W: Watcher>(watcher: W, options: RuntimeOptions) -> Result<(), RunError> {
    let (handle, stream) = start_stream_with(watcher)?;
    tracing::info!("Network change monitoring started");

    let end = watch_events(stream, options.count).await;
    if end == LoopEnd::StreamEnded {
        tracing::warn!("Event stream ended, collecting monitor fault");
    }

    match handle.stop() {
        Ok(()) => {
            tracing::debug!("Monitor stopped cleanly");
            Ok(())
        }
        Err(fault) => Err(RunError::Monitor(fault)),
    }
}

/// Consumes events until shutdown, the count limit, or stream end.
async fn watch_events(mut stream: EventStream, count: Option<u64>) -> LoopEnd {
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut delivered: u64 = 0;

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                return LoopEnd::Shutdown;
            }

            event = stream.next() => {
                match event {
                    Some(_) => {
                        delivered += 1;
                        tracing::info!(
                            "Network configuration changed (event #{delivered}), re-scan interfaces now"
                        );
                        if count.is_some_and(|limit| delivered >= limit) {
                            tracing::info!("Reached {delivered} event(s), stopping...");
                            return LoopEnd::CountReached;
                        }
                    }
                    None => return LoopEnd::StreamEnded,
                }
            }
        }
    }
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
