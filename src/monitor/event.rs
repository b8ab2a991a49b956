//! Change event marker type.

/// A payload-free notification that the host network configuration changed.
///
/// The event deliberately carries no detail. Pushing the full re-scan to
/// the consumer keeps OS-specific interface models out of the core; a
/// consumer that needs to know *what* changed enumerates its interfaces
/// when an event arrives.
///
/// One synthetic event is always delivered immediately after a monitor
/// starts, so the initial scan needs no separate first-run path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeEvent;
