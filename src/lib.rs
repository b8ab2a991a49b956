//! netwake: host network-change notifications.
//!
//! A library for watching the operating system's network configuration
//! (interface state, addresses, routes) and telling a consumer *that*
//! something changed, never *what*. Consumers re-scan whatever network
//! state they care about on each event, including the synthetic event
//! delivered immediately after start.

pub mod cancel;
pub mod monitor;
pub mod stream;
pub mod watcher;
