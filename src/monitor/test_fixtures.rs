//! Shared test fixtures for monitor tests.

use crate::cancel::CancelToken;
use crate::watcher::{Subscription, Wake, Watcher, WatcherError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, mpsc};

/// Mock watcher driven by a [`SignalInjector`].
///
/// Mirrors the channel shape of the real platform subscriptions: the test
/// injects change signals (or a terminal error) through a channel, and the
/// cancel token's wake hook sends a sentinel that `wait` tells apart from a
/// real change via the cancelled flag.
pub(crate) struct ScriptedWatcher {
    receiver: Mutex<Option<mpsc::Receiver<Result<(), WatcherError>>>>,
    waker: mpsc::Sender<Result<(), WatcherError>>,
    open_error: Mutex<Option<WatcherError>>,
    dropped: Arc<AtomicBool>,
}

impl ScriptedWatcher {
    /// Creates a watcher whose signals the test injects live.
    pub(crate) fn scripted() -> (Self, SignalInjector) {
        let (sender, receiver) = mpsc::channel();
        let watcher = Self {
            receiver: Mutex::new(Some(receiver)),
            waker: sender.clone(),
            open_error: Mutex::new(None),
            dropped: Arc::new(AtomicBool::new(false)),
        };
        (watcher, SignalInjector { sender })
    }

    /// Creates a watcher whose `open` fails with the given error.
    pub(crate) fn failing_open(error: WatcherError) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            receiver: Mutex::new(Some(receiver)),
            waker: sender,
            open_error: Mutex::new(Some(error)),
            dropped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that flips once the opened subscription has been dropped.
    pub(crate) fn drop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.dropped)
    }
}

impl Watcher for ScriptedWatcher {
    type Subscription = ScriptedSubscription;

    fn open(&self, cancel: CancelToken) -> Result<Self::Subscription, WatcherError> {
        if let Some(error) = self.open_error.lock().unwrap().take() {
            return Err(error);
        }

        let receiver = self
            .receiver
            .lock()
            .unwrap()
            .take()
            .expect("scripted watcher opened twice");

        let waker = self.waker.clone();
        cancel.on_cancel(move || {
            let _ = waker.send(Ok(()));
        });

        Ok(ScriptedSubscription {
            receiver,
            cancel,
            dropped: Arc::clone(&self.dropped),
        })
    }
}

pub(crate) struct ScriptedSubscription {
    receiver: mpsc::Receiver<Result<(), WatcherError>>,
    cancel: CancelToken,
    dropped: Arc<AtomicBool>,
}

impl Subscription for ScriptedSubscription {
    fn wait(&mut self) -> Result<Wake, WatcherError> {
        match self.receiver.recv() {
            Ok(Ok(())) => {
                if self.cancel.is_cancelled() {
                    Ok(Wake::Cancelled)
                } else {
                    Ok(Wake::Changed)
                }
            }
            Ok(Err(error)) => Err(error),
            Err(mpsc::RecvError) => Err(WatcherError::Stopped),
        }
    }
}

impl Drop for ScriptedSubscription {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

/// Test-side handle injecting signals into a [`ScriptedWatcher`].
pub(crate) struct SignalInjector {
    sender: mpsc::Sender<Result<(), WatcherError>>,
}

impl SignalInjector {
    /// Simulates one OS change notification.
    ///
    /// Ignores send failures: a monitor that already stopped no longer
    /// listens, which is exactly what post-shutdown injection tests need.
    pub(crate) fn signal(&self) {
        let _ = self.sender.send(Ok(()));
    }

    /// Simulates a terminal watcher failure.
    pub(crate) fn fail(&self, error: WatcherError) {
        let _ = self.sender.send(Err(error));
    }
}
