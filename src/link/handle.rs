//! Reference-counted handle to the peer link.
//!
//! Cloning a [`ConnHandle`] takes a strong reference; dropping one releases
//! it.  The tracker holds one reference for as long as the link is up, and
//! the notifier borrows a second one for the duration of a single send, so
//! a teardown that races a notify can never leave the notifier holding a
//! dangling link.

use core::fmt;
use std::sync::Arc;

/// Bluetooth device address, printed most-significant byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerAddr(pub [u8; 6]);

impl fmt::Display for PeerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The radio stack hands the address over little-endian.
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}", g, e, d, c, b, a)
    }
}

/// Radio-stack identity of one peer connection.
#[derive(Debug, PartialEq, Eq)]
pub struct PeerLink {
    conn_id: u16,
    peer: [u8; 6],
}

#[derive(Debug, Clone)]
pub struct ConnHandle(Arc<PeerLink>);

impl ConnHandle {
    pub fn new(conn_id: u16, peer: [u8; 6]) -> Self {
        Self(Arc::new(PeerLink { conn_id, peer }))
    }

    pub fn conn_id(&self) -> u16 {
        self.0.conn_id
    }

    /// Peer Bluetooth device address.
    pub fn peer(&self) -> PeerAddr {
        PeerAddr(self.0.peer)
    }

    /// Number of live references to this link (tracker + in-flight sends).
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// Whether two handles refer to the same link instance.
    pub fn same_link(&self, other: &ConnHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
