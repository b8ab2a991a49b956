//! Tests for the Linux rtnetlink subscription.
//!
//! Binding an rtnetlink multicast socket requires no privileges, so these
//! run in any Linux environment. Actual change notifications would require
//! reconfiguring interfaces and are not exercised here.

use super::linux::{LinuxSubscription, LinuxWatcher};
use crate::cancel::CancelToken;
use crate::watcher::{Subscription, Wake, Watcher};
use std::time::Duration;

#[test]
fn watcher_opens_subscription() {
    let watcher = LinuxWatcher::new();
    let subscription = watcher.open(CancelToken::new());

    assert!(subscription.is_ok());
}

#[test]
fn subscription_debug_output() {
    let watcher = LinuxWatcher::default();
    let subscription = watcher
        .open(CancelToken::new())
        .expect("Failed to bind netlink socket");

    let debug_str = format!("{subscription:?}");
    assert!(debug_str.contains("LinuxSubscription"));
    assert!(debug_str.contains("cancelled"));
}

#[test]
fn subscription_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<LinuxSubscription>();
}

#[test]
fn cancel_unblocks_pending_wait() {
    let watcher = LinuxWatcher::new();
    let cancel = CancelToken::new();
    let mut subscription = watcher
        .open(cancel.clone())
        .expect("Failed to bind netlink socket");

    let waiter = std::thread::spawn(move || subscription.wait());

    std::thread::sleep(Duration::from_millis(50));
    cancel.cancel();

    let outcome = waiter.join().expect("wait thread panicked");
    assert!(matches!(outcome, Ok(Wake::Cancelled)));
}

#[test]
fn wait_after_cancel_returns_cancelled() {
    let watcher = LinuxWatcher::new();
    let cancel = CancelToken::new();
    let mut subscription = watcher
        .open(cancel.clone())
        .expect("Failed to bind netlink socket");

    cancel.cancel();

    assert!(matches!(subscription.wait(), Ok(Wake::Cancelled)));
}
