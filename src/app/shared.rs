//! State shared between execution contexts.
//!
//! | Field       | Writers                     | Readers                 |
//! |-------------|-----------------------------|-------------------------|
//! | `signal`    | hall ISR, link-up callback  | debounce worker         |
//! | `tracker`   | link callbacks              | notifier (worker)       |
//! | `published` | debounce worker             | GATT read callback      |
//!
//! On the device one `static` instance lives in [`crate::drivers::hall`];
//! tests build their own.

use log::debug;

use super::events::AppEvent;
use super::ports::EventSink;
use crate::hall::{EdgeSignal, PublishedState};
use crate::link::{ConnHandle, ConnectionTracker, LinkTransition};

pub struct SharedState {
    pub signal: EdgeSignal,
    pub tracker: ConnectionTracker,
    pub published: PublishedState,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            signal: EdgeSignal::new(),
            tracker: ConnectionTracker::new(),
            published: PublishedState::new(),
        }
    }

    /// Link-established callback.  A non-zero `status` is a failed attempt
    /// and leaves the tracker untouched.  On success the worker is woken so
    /// the pin is re-sampled with a peer present.
    pub fn on_link_up(
        &self,
        status: u8,
        handle: ConnHandle,
        sink: &mut impl EventSink,
    ) -> LinkTransition {
        if status != 0 {
            debug!("link: connect attempt failed (status={})", status);
            return LinkTransition::Ignored;
        }
        let conn_id = handle.conn_id();
        let transition = self.tracker.on_connected(handle);
        sink.emit(&AppEvent::PeerConnected { conn_id });
        self.signal.post();
        transition
    }

    /// Link-teardown callback.
    pub fn on_link_down(&self, conn_id: u16, sink: &mut impl EventSink) -> LinkTransition {
        let transition = self.tracker.on_disconnected(conn_id);
        if transition == LinkTransition::Disconnected {
            sink.emit(&AppEvent::PeerDisconnected { conn_id });
        }
        transition
    }

    /// Characteristic value for a peer read request.
    pub fn read_payload(&self) -> u8 {
        self.published.payload()
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
