//! Tests for the monitor loop.
//!
//! These drive `worker::run` directly with a scripted watcher and a raw
//! bridge receiver, without the delivery thread on top.

use super::super::bridge;
use super::super::error::MonitorFault;
use super::super::handle::FaultSlot;
use super::super::test_fixtures::ScriptedWatcher;
use super::run;
use crate::cancel::CancelToken;
use crate::watcher::WatcherError;
use std::sync::atomic::Ordering;
use std::time::Duration;

const WAIT_WINDOW: Duration = Duration::from_secs(2);

#[test]
fn posts_one_event_per_signal() {
    let (watcher, injector) = ScriptedWatcher::scripted();
    let (events, receiver) = bridge::channel();
    let cancel = CancelToken::new();
    let faults = FaultSlot::default();

    let worker = {
        let cancel = cancel.clone();
        let faults = faults.clone();
        std::thread::spawn(move || run(watcher, events, cancel, faults))
    };

    injector.signal();
    injector.signal();
    receiver.recv_timeout(WAIT_WINDOW).expect("first event");
    receiver.recv_timeout(WAIT_WINDOW).expect("second event");

    cancel.cancel();
    worker.join().expect("worker panicked");
    assert!(faults.take().is_none());
}

#[test]
fn cancellation_stops_loop_and_releases_subscription() {
    let (watcher, _injector) = ScriptedWatcher::scripted();
    let released = watcher.drop_flag();
    let (events, receiver) = bridge::channel();
    let cancel = CancelToken::new();
    let faults = FaultSlot::default();

    let worker = {
        let cancel = cancel.clone();
        let faults = faults.clone();
        std::thread::spawn(move || run(watcher, events, cancel, faults))
    };

    cancel.cancel();
    worker.join().expect("worker panicked");

    assert!(released.load(Ordering::SeqCst));
    assert!(faults.take().is_none());
    // No events were posted.
    assert!(receiver.try_recv().is_err());
}

#[test]
fn terminal_error_records_fault_and_releases_subscription() {
    let (watcher, injector) = ScriptedWatcher::scripted();
    let released = watcher.drop_flag();
    let (events, receiver) = bridge::channel();
    let faults = FaultSlot::default();

    let worker = {
        let faults = faults.clone();
        std::thread::spawn(move || run(watcher, events, CancelToken::new(), faults))
    };

    injector.signal();
    receiver.recv_timeout(WAIT_WINDOW).expect("event");

    injector.fail(WatcherError::Stopped);
    worker.join().expect("worker panicked");

    assert!(released.load(Ordering::SeqCst));
    assert!(matches!(
        faults.take(),
        Some(MonitorFault::Wait(WatcherError::Stopped))
    ));
}

#[test]
fn open_failure_records_fault_without_posting() {
    let watcher = ScriptedWatcher::failing_open(WatcherError::Unsupported);
    let (events, receiver) = bridge::channel();
    let faults = FaultSlot::default();

    let worker = {
        let faults = faults.clone();
        std::thread::spawn(move || run(watcher, events, CancelToken::new(), faults))
    };
    worker.join().expect("worker panicked");

    assert!(matches!(
        faults.take(),
        Some(MonitorFault::Open(WatcherError::Unsupported))
    ));
    assert!(receiver.try_recv().is_err());
}

#[test]
fn no_events_posted_after_terminal_error() {
    let (watcher, injector) = ScriptedWatcher::scripted();
    let (events, receiver) = bridge::channel();
    let faults = FaultSlot::default();

    let worker = {
        let faults = faults.clone();
        std::thread::spawn(move || run(watcher, events, CancelToken::new(), faults))
    };

    injector.fail(WatcherError::Stopped);
    worker.join().expect("worker panicked");

    // Signals injected after the loop stopped go nowhere.
    injector.signal();
    injector.signal();

    assert!(receiver.try_recv().is_err());
    assert!(faults.take().is_some());
}
