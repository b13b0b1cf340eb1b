//! Connection tracker — the single-peer link slot.
//!
//! Written by radio-stack callbacks, read by the worker's notifier.  Both
//! sides go through one mutex-guarded [`LinkState`]; readers clone the
//! handle out under the lock and use it after releasing the lock.
//!
//! ```text
//!   Disconnected ──on_connected(h)──▶ Connected(h)
//!        ▲                                 │
//!        └──────on_disconnected(id)────────┘
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{info, warn};

use super::handle::ConnHandle;

#[derive(Debug, Clone, Default)]
pub enum LinkState {
    #[default]
    Disconnected,
    Connected(ConnHandle),
}

/// Outcome of feeding a link callback into the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTransition {
    /// Disconnected → Connected.
    Connected,
    /// A stale handle was still held; it was released before the new one
    /// was stored.
    Replaced,
    /// Connected → Disconnected.
    Disconnected,
    /// The callback did not match the tracked link and was ignored.
    Ignored,
}

pub struct ConnectionTracker {
    slot: Mutex<LinkState>,
}

impl ConnectionTracker {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(LinkState::Disconnected),
        }
    }

    pub fn state(&self) -> LinkState {
        self.lock().clone()
    }

    pub fn is_connected(&self) -> bool {
        matches!(*self.lock(), LinkState::Connected(_))
    }

    /// Link-established callback.  Any previously held handle is dropped
    /// before `handle` is stored.
    pub fn on_connected(&self, handle: ConnHandle) -> LinkTransition {
        let mut slot = self.lock();
        let prior = core::mem::take(&mut *slot);
        let transition = match prior {
            LinkState::Disconnected => LinkTransition::Connected,
            LinkState::Connected(stale) => {
                warn!(
                    "link: conn {} still tracked on new connect, releasing",
                    stale.conn_id()
                );
                drop(stale);
                LinkTransition::Replaced
            }
        };
        info!(
            "link: peer connected (conn_id={}, addr={})",
            handle.conn_id(),
            handle.peer()
        );
        *slot = LinkState::Connected(handle);
        transition
    }

    /// Link-teardown callback for `conn_id`.
    pub fn on_disconnected(&self, conn_id: u16) -> LinkTransition {
        let mut slot = self.lock();
        let tracked = match &*slot {
            LinkState::Connected(h) => Some(h.conn_id()),
            LinkState::Disconnected => None,
        };
        match tracked {
            Some(id) if id == conn_id => {
                *slot = LinkState::Disconnected;
                info!("link: peer disconnected (conn_id={})", conn_id);
                LinkTransition::Disconnected
            }
            Some(id) => {
                warn!(
                    "link: disconnect for conn {} while tracking conn {}, ignored",
                    conn_id, id
                );
                LinkTransition::Ignored
            }
            None => LinkTransition::Ignored,
        }
    }

    /// A strong reference to the current link, or `None`.  The returned
    /// handle stays valid even if the link is torn down while it is in use.
    pub fn current(&self) -> Option<ConnHandle> {
        match &*self.lock() {
            LinkState::Connected(h) => Some(h.clone()),
            LinkState::Disconnected => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LinkState> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}
