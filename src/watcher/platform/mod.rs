//! Platform-specific change subscription implementations.
//!
//! This module provides conditional compilation for platform-specific
//! implementations of the [`Watcher`](crate::watcher::Watcher) trait.
//!
//! # Platform Support
//!
//! - **Windows**: Uses `NotifyIpInterfaceChange` via the `windows` crate.
//! - **Linux**: Uses an rtnetlink multicast socket via `netlink-sys`.
//! - **Other**: [`UnsupportedWatcher`], whose `open` fails immediately.
//!   A watcher that silently does nothing would leave the monitor thread
//!   pretending to monitor forever, so the fallback fails loudly instead.

#[cfg(target_os = "linux")]
mod linux;
mod unsupported;
#[cfg(windows)]
mod windows;

#[cfg(all(windows, test))]
mod windows_tests;

#[cfg(all(target_os = "linux", test))]
mod linux_tests;

#[cfg(target_os = "linux")]
pub use linux::{LinuxSubscription, LinuxWatcher};
pub use unsupported::{Never, UnsupportedWatcher};
#[cfg(windows)]
pub use windows::{WindowsSubscription, WindowsWatcher};

// Re-export the default watcher for the current platform as PlatformWatcher.
#[cfg(target_os = "linux")]
pub use linux::LinuxWatcher as PlatformWatcher;
#[cfg(not(any(windows, target_os = "linux")))]
pub use unsupported::UnsupportedWatcher as PlatformWatcher;
#[cfg(windows)]
pub use windows::WindowsWatcher as PlatformWatcher;
