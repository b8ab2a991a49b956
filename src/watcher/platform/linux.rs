//! Linux change subscription using an rtnetlink multicast socket.

use crate::cancel::CancelToken;
use crate::watcher::{Subscription, Wake, Watcher, WatcherError};
use netlink_packet_core::{NetlinkMessage, NetlinkPayload};
use netlink_packet_route::RouteNetlinkMessage;
use netlink_sys::{Socket, SocketAddr, protocols::NETLINK_ROUTE};
use std::io::{ErrorKind, Write};
use std::os::fd::AsRawFd;
use std::os::unix::net::UnixStream;

/// `RTMGRP_*` multicast group bitmasks (from `linux/rtnetlink.h`).
///
/// Subscribing to these groups covers the three change classes the monitor
/// cares about: link state, addresses, and routes.
const RTMGRP_LINK: u32 = 0x0000_0001;
const RTMGRP_IPV4_IFADDR: u32 = 0x0000_0010;
const RTMGRP_IPV4_ROUTE: u32 = 0x0000_0040;
const RTMGRP_IPV6_IFADDR: u32 = 0x0000_0100;
const RTMGRP_IPV6_ROUTE: u32 = 0x0000_0400;

const GROUPS: u32 =
    RTMGRP_LINK | RTMGRP_IPV4_IFADDR | RTMGRP_IPV4_ROUTE | RTMGRP_IPV6_IFADDR | RTMGRP_IPV6_ROUTE;

/// Receive buffer size; the standard netlink datagram bound.
const RECV_BUFFER_SIZE: usize = 8192;

/// Linux watcher using rtnetlink multicast groups.
///
/// The kernel publishes link, address, and route changes to bound
/// subscribers; no privileges are required to listen. The subscription is
/// persistent, so re-arming after a delivered notification is implicit.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxWatcher {
    // No configuration yet; the struct allows future extension.
    _private: (),
}

impl LinuxWatcher {
    /// Creates a new Linux watcher.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl Watcher for LinuxWatcher {
    type Subscription = LinuxSubscription;

    fn open(&self, cancel: CancelToken) -> Result<Self::Subscription, WatcherError> {
        LinuxSubscription::bind(cancel)
    }
}

/// Live rtnetlink multicast subscription.
///
/// Blocks in `poll(2)` on two descriptors: the netlink socket and the read
/// half of a wake socketpair. The cancel token's wake hook writes a byte to
/// the other half, which is the second wakeable handle that lets a pending
/// wait unblock for shutdown.
pub struct LinuxSubscription {
    socket: Socket,
    wake_rx: UnixStream,
    cancel: CancelToken,
    buffer: Vec<u8>,
}

impl std::fmt::Debug for LinuxSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinuxSubscription")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl LinuxSubscription {
    fn bind(cancel: CancelToken) -> Result<Self, WatcherError> {
        let mut socket = Socket::new(NETLINK_ROUTE).map_err(WatcherError::Netlink)?;

        // Kernel-assigned pid (0), groups as a bitmask.
        let addr = SocketAddr::new(0, GROUPS);
        socket.bind(&addr).map_err(WatcherError::Netlink)?;

        let (wake_tx, wake_rx) = UnixStream::pair().map_err(WatcherError::Netlink)?;
        wake_tx.set_nonblocking(true).map_err(WatcherError::Netlink)?;
        wake_rx.set_nonblocking(true).map_err(WatcherError::Netlink)?;

        // Wake hook: one byte on the pair unblocks a pending poll. The
        // write half lives inside the hook, which the token keeps alive.
        cancel.on_cancel(move || {
            let _ = (&wake_tx).write(&[1]);
        });

        Ok(Self {
            socket,
            wake_rx,
            cancel,
            buffer: Vec::with_capacity(RECV_BUFFER_SIZE),
        })
    }

    /// Blocks in `poll(2)` until the netlink socket or the wake handle is
    /// readable. Returns true when the wake handle fired.
    fn poll_readable(&self) -> Result<bool, WatcherError> {
        let mut fds = [
            libc::pollfd {
                fd: self.socket.as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            },
            libc::pollfd {
                fd: self.wake_rx.as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            },
        ];

        loop {
            // SAFETY: fds points to a valid, properly sized array and the
            // kernel only writes to the revents fields.
            let rc = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, -1) };
            if rc >= 0 {
                return Ok(fds[1].revents != 0);
            }

            let err = std::io::Error::last_os_error();
            if err.kind() == ErrorKind::Interrupted {
                continue;
            }
            return Err(WatcherError::Netlink(err));
        }
    }
}

impl Subscription for LinuxSubscription {
    fn wait(&mut self) -> Result<Wake, WatcherError> {
        loop {
            if self.cancel.is_cancelled() {
                return Ok(Wake::Cancelled);
            }

            let woken = self.poll_readable()?;
            if woken || self.cancel.is_cancelled() {
                return Ok(Wake::Cancelled);
            }

            self.buffer.clear();
            match self.socket.recv(&mut self.buffer, libc::MSG_DONTWAIT) {
                Ok(len) => {
                    tracing::debug!(
                        event = describe(&self.buffer[..len]),
                        "network change signalled"
                    );
                    return Ok(Wake::Changed);
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    // Spurious poll wakeup; re-arm.
                }
                Err(ref e) if e.raw_os_error() == Some(libc::ENOBUFS) => {
                    // The kernel dropped notifications under load. The
                    // consumer re-scans on every event anyway, so a missed
                    // detail is covered by reporting one change now.
                    tracing::warn!("netlink receive queue overflowed");
                    return Ok(Wake::Changed);
                }
                Err(e) => return Err(WatcherError::Netlink(e)),
            }
        }
    }
}

/// Classifies the first rtnetlink message in a datagram, for logging only.
///
/// The change event stays payload-free regardless; what actually changed is
/// the consumer's business to re-scan.
fn describe(bytes: &[u8]) -> &'static str {
    let Ok(message) = NetlinkMessage::<RouteNetlinkMessage>::deserialize(bytes) else {
        return "unparsed";
    };

    match message.payload {
        NetlinkPayload::InnerMessage(RouteNetlinkMessage::NewLink(_)) => "link up/changed",
        NetlinkPayload::InnerMessage(RouteNetlinkMessage::DelLink(_)) => "link removed",
        NetlinkPayload::InnerMessage(RouteNetlinkMessage::NewAddress(_)) => "address added",
        NetlinkPayload::InnerMessage(RouteNetlinkMessage::DelAddress(_)) => "address removed",
        NetlinkPayload::InnerMessage(RouteNetlinkMessage::NewRoute(_)) => "route added",
        NetlinkPayload::InnerMessage(RouteNetlinkMessage::DelRoute(_)) => "route removed",
        _ => "other",
    }
}
