//! Platform watcher abstraction.
//!
//! This module provides:
//! - The [`Watcher`] and [`Subscription`] traits that hide per-OS
//!   notification APIs behind a single blocking primitive
//! - The wait outcome type ([`Wake`])
//! - Error handling ([`WatcherError`])
//! - Platform implementations ([`platform`])

mod error;
pub mod platform;

pub use error::WatcherError;

use crate::cancel::CancelToken;

/// Outcome of a successful blocking wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// The OS reported a network-configuration change.
    Changed,
    /// The cancel token fired; the subscription should be released.
    Cancelled,
}

/// Factory for per-OS change subscriptions.
///
/// Implementations wrap platform APIs like Windows `NotifyIpInterfaceChange`
/// or Linux rtnetlink multicast groups. A watcher is moved onto the monitor
/// thread and opened there, so the blocking registration never touches the
/// caller's thread.
pub trait Watcher: Send + 'static {
    /// The subscription type produced by `open`.
    type Subscription: Subscription;

    /// Opens a live subscription to OS change notifications.
    ///
    /// The subscription must install a wake hook on `cancel` so a pending
    /// [`Subscription::wait`] unblocks when the token fires.
    ///
    /// # Errors
    ///
    /// Returns [`WatcherError::Unsupported`] when no implementation exists
    /// for the current platform, or a platform error when registration
    /// fails. Either way the monitor never becomes active.
    fn open(&self, cancel: CancelToken) -> Result<Self::Subscription, WatcherError>;
}

/// A live subscription to OS change notifications.
///
/// Dropping the subscription releases the underlying OS resource.
pub trait Subscription {
    /// Blocks until the next change, cancellation, or terminal error.
    ///
    /// After returning [`Wake::Changed`] the subscription is re-armed and
    /// `wait` may be called again for the next change; one-shot OS
    /// primitives are re-registered internally.
    ///
    /// # Errors
    ///
    /// Any error is terminal for the subscription: callers must not retry,
    /// and should drop the subscription to release the OS handle.
    fn wait(&mut self) -> Result<Wake, WatcherError>;
}
