//! Tests for the Windows change subscription.

use super::windows::{WindowsSubscription, WindowsWatcher};
use crate::cancel::CancelToken;
use crate::watcher::{Subscription, Wake, Watcher};
use std::time::Duration;

#[test]
fn watcher_opens_subscription() {
    let watcher = WindowsWatcher::new();
    let subscription = watcher.open(CancelToken::new());

    assert!(subscription.is_ok());
}

#[test]
fn subscription_debug_output() {
    let watcher = WindowsWatcher::default();
    let subscription = watcher
        .open(CancelToken::new())
        .expect("Failed to register notification");

    let debug_str = format!("{subscription:?}");
    assert!(debug_str.contains("WindowsSubscription"));
    assert!(debug_str.contains("cancelled"));
}

#[test]
fn subscription_is_send() {
    fn assert_send<T: Send>() {}
    // Registration is private, but WindowsSubscription contains it and must
    // be Send, which transitively requires Registration to be Send.
    assert_send::<WindowsSubscription>();
}

#[test]
fn cancel_unblocks_pending_wait() {
    let watcher = WindowsWatcher::new();
    let cancel = CancelToken::new();
    let mut subscription = watcher
        .open(cancel.clone())
        .expect("Failed to register notification");

    let waiter = std::thread::spawn(move || subscription.wait());

    std::thread::sleep(Duration::from_millis(50));
    cancel.cancel();

    let outcome = waiter.join().expect("wait thread panicked");
    assert!(matches!(outcome, Ok(Wake::Cancelled)));
}

#[test]
fn wait_after_cancel_returns_cancelled() {
    let watcher = WindowsWatcher::new();
    let cancel = CancelToken::new();
    let mut subscription = watcher
        .open(cancel.clone())
        .expect("Failed to register notification");

    cancel.cancel();

    assert!(matches!(subscription.wait(), Ok(Wake::Cancelled)));
}
