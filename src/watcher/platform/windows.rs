//! Windows change subscription using `NotifyIpInterfaceChange`.

use crate::cancel::CancelToken;
use crate::watcher::{Subscription, Wake, Watcher, WatcherError};
use std::sync::mpsc;
use windows::Win32::Foundation::{HANDLE, NO_ERROR, WIN32_ERROR};
use windows::Win32::NetworkManagement::IpHelper::{
    CancelMibChangeNotify2, MIB_IPINTERFACE_ROW, MIB_NOTIFICATION_TYPE, NotifyIpInterfaceChange,
};
use windows::Win32::Networking::WinSock::AF_UNSPEC;

/// Windows watcher using the IP Helper API.
///
/// `NotifyIpInterfaceChange` invokes a callback from the Windows thread
/// pool on every IP interface change. The subscription funnels those
/// callbacks into a channel so [`Subscription::wait`] can block on the
/// monitor thread. The registration is persistent, so re-arming after a
/// delivered notification is implicit.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsWatcher {
    // No configuration yet; the struct allows future extension.
    _private: (),
}

impl WindowsWatcher {
    /// Creates a new Windows watcher.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl Watcher for WindowsWatcher {
    type Subscription = WindowsSubscription;

    fn open(&self, cancel: CancelToken) -> Result<Self::Subscription, WatcherError> {
        WindowsSubscription::register(cancel)
    }
}

/// Live registration with `NotifyIpInterfaceChange`.
pub struct WindowsSubscription {
    /// Receives one `()` per OS notification, plus wake-hook sentinels.
    receiver: mpsc::Receiver<()>,
    cancel: CancelToken,
    /// Held for its `Drop` impl, which cancels the OS registration and
    /// reclaims the leaked callback context.
    _registration: Registration,
}

impl std::fmt::Debug for WindowsSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowsSubscription")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl WindowsSubscription {
    fn register(cancel: CancelToken) -> Result<Self, WatcherError> {
        let (sender, receiver) = mpsc::channel::<()>();

        // Wake hook: a sentinel send unblocks a pending recv; wait() then
        // consults the cancelled flag to tell it apart from a real change.
        let wake_sender = sender.clone();
        cancel.on_cancel(move || {
            let _ = wake_sender.send(());
        });

        let registration = register_notification(sender)?;

        Ok(Self {
            receiver,
            cancel,
            _registration: registration,
        })
    }
}

impl Subscription for WindowsSubscription {
    fn wait(&mut self) -> Result<Wake, WatcherError> {
        match self.receiver.recv() {
            Ok(()) => {
                if self.cancel.is_cancelled() {
                    Ok(Wake::Cancelled)
                } else {
                    tracing::debug!("IP interface change signalled");
                    Ok(Wake::Changed)
                }
            }
            // All senders gone while the registration is still alive:
            // the producer side vanished without an explicit error.
            Err(mpsc::RecvError) => Err(WatcherError::Stopped),
        }
    }
}

/// RAII wrapper for the notification handle.
///
/// Cancels the OS registration when dropped, and reclaims the leaked
/// `CallbackContext` to prevent a memory leak.
struct Registration {
    handle: HANDLE,
    /// Raw pointer to reclaim the leaked `CallbackContext` after
    /// cancellation. Dropping the context drops the sender, which closes
    /// the channel.
    context_ptr: *mut CallbackContext,
}

impl Drop for Registration {
    fn drop(&mut self) {
        // SAFETY: We own this handle and it was returned by
        // NotifyIpInterfaceChange. CancelMibChangeNotify2 is safe to call
        // once per handle.
        let _ = unsafe { CancelMibChangeNotify2(self.handle) };

        // SAFETY: After CancelMibChangeNotify2 returns, Windows guarantees
        // the callback won't fire again, so the context can be reclaimed.
        drop(unsafe { Box::from_raw(self.context_ptr) });
    }
}

// SAFETY: The HANDLE is thread-safe for the cancel operation. The Windows
// API guarantees that CancelMibChangeNotify2 can be called from any thread.
unsafe impl Send for Registration {}

/// Context passed to the Windows callback.
struct CallbackContext {
    sender: mpsc::Sender<()>,
}

/// Registers for IP interface change notifications.
///
/// The callback context is leaked intentionally so it outlives the
/// registration; [`Registration::drop`] reclaims it after cancelling.
///
/// # Coverage Note
///
/// Excluded from coverage: requires actual Windows API interaction, and
/// callback testing requires triggering real network changes.
#[cfg(not(tarpaulin_include))]
fn register_notification(sender: mpsc::Sender<()>) -> Result<Registration, WatcherError> {
    let context_ptr = Box::into_raw(Box::new(CallbackContext { sender }));
    let void_ptr = context_ptr.cast::<std::ffi::c_void>();

    let mut handle = HANDLE::default();

    // SAFETY: We provide a valid callback and context. The callback is
    // invoked from the Windows thread pool on IP interface changes.
    // InitialNotification = false: the synthetic startup event comes from
    // the lifecycle layer, not the OS registration.
    let result = unsafe {
        NotifyIpInterfaceChange(
            AF_UNSPEC,
            Some(interface_change_callback),
            Some(void_ptr),
            false,
            &raw mut handle,
        )
    };

    if result != NO_ERROR {
        // SAFETY: Registration failed, so Windows won't call the callback;
        // reclaim the leaked context here.
        drop(unsafe { Box::from_raw(context_ptr) });
        return Err(windows::core::Error::from(WIN32_ERROR(result.0)).into());
    }

    Ok(Registration {
        handle,
        context_ptr,
    })
}

/// Callback function for `NotifyIpInterfaceChange`.
///
/// # Safety
///
/// - `caller_context` must be a valid pointer to `CallbackContext`
/// - `row` may be null and is not used
///
/// # Coverage Note
///
/// Excluded from coverage: only called by Windows.
#[cfg(not(tarpaulin_include))]
unsafe extern "system" fn interface_change_callback(
    caller_context: *const std::ffi::c_void,
    _row: *const MIB_IPINTERFACE_ROW,
    _notification_type: MIB_NOTIFICATION_TYPE,
) {
    if caller_context.is_null() {
        return;
    }

    // SAFETY: caller_context was set by register_notification and points
    // to a valid CallbackContext.
    let context = unsafe { &*(caller_context.cast::<CallbackContext>()) };

    // Ignore send errors: the receiver may already be dropped.
    let _ = context.sender.send(());
}
