//! Fallback watcher for platforms without an implementation.

use crate::cancel::CancelToken;
use crate::watcher::{Subscription, Wake, Watcher, WatcherError};

/// Watcher for platforms with no change-notification implementation.
///
/// `open` fails immediately with [`WatcherError::Unsupported`], which the
/// monitor loop surfaces through the diagnostic path. The subscription type
/// is uninhabited: no value of it can ever exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedWatcher;

/// Uninhabited subscription type for [`UnsupportedWatcher`].
#[derive(Debug)]
pub enum Never {}

impl Subscription for Never {
    fn wait(&mut self) -> Result<Wake, WatcherError> {
        match *self {}
    }
}

impl Watcher for UnsupportedWatcher {
    type Subscription = Never;

    fn open(&self, _cancel: CancelToken) -> Result<Self::Subscription, WatcherError> {
        Err(WatcherError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_fails_with_unsupported() {
        let watcher = UnsupportedWatcher;
        let result = watcher.open(CancelToken::new());

        assert!(matches!(result, Err(WatcherError::Unsupported)));
    }

    #[test]
    fn open_fails_even_when_already_cancelled() {
        let watcher = UnsupportedWatcher;
        let cancel = CancelToken::new();
        cancel.cancel();

        assert!(matches!(
            watcher.open(cancel),
            Err(WatcherError::Unsupported)
        ));
    }
}
