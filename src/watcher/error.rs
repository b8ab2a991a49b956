//! Error types for platform watchers.

use thiserror::Error;

/// Error type for change subscriptions.
///
/// Every variant is terminal for the session: the monitor loop stops
/// permanently and never retries. Faults are surfaced through the
/// diagnostic path, never through the change-event callback.
#[derive(Debug, Error)]
pub enum WatcherError {
    /// No watcher implementation exists for the current platform.
    #[error("network change notifications are not supported on this platform")]
    Unsupported,

    /// Windows IP Helper API call failed.
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    /// Netlink socket operation failed.
    #[cfg(target_os = "linux")]
    #[error("netlink error: {0}")]
    Netlink(#[source] std::io::Error),

    /// The notification channel closed while the subscription was live.
    ///
    /// This can happen when the OS-side producer goes away without an
    /// explicit error.
    #[error("watcher stopped unexpectedly")]
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_displays_message() {
        let error = WatcherError::Unsupported;
        assert_eq!(
            error.to_string(),
            "network change notifications are not supported on this platform"
        );
    }

    #[test]
    fn stopped_displays_message() {
        let error = WatcherError::Stopped;
        assert_eq!(error.to_string(), "watcher stopped unexpectedly");
    }

    #[cfg(windows)]
    #[test]
    fn windows_error_preserves_source() {
        use windows::core::{Error as WinError, HRESULT};

        let win_error = WinError::from_hresult(HRESULT(-2_147_024_809)); // E_INVALIDARG
        let error: WatcherError = win_error.into();

        assert!(error.to_string().contains("Windows API error"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn netlink_error_preserves_source() {
        use std::error::Error as _;

        let io_error = std::io::Error::from_raw_os_error(libc::EPERM);
        let error = WatcherError::Netlink(io_error);

        assert!(error.to_string().contains("netlink error"));
        assert!(error.source().is_some());
    }
}
