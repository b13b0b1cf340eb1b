//! Outbound application events.
//!
//! The boot sequence and [`HallService`](super::service::HallService) emit
//! these through the [`EventSink`](super::ports::EventSink) port.

use crate::error::LinkError;
use crate::hall::SensorState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Boot finished; carries the undebounced initial sample.
    Booted { initial: SensorState },

    /// A settled sample differed from the last published state.
    StateChanged { from: SensorState, to: SensorState },

    /// The new state was sent to the connected peer.
    Notified { state: SensorState, conn_id: u16 },

    /// No peer connected; the change was not sent and will not be replayed.
    NotifyDropped { state: SensorState },

    /// The radio rejected the send.  Not retried.
    NotifyFailed { state: SensorState, error: LinkError },

    PeerConnected { conn_id: u16 },

    PeerDisconnected { conn_id: u16 },

    AdvertisingStarted,

    /// Radio bring-up or advertising failed; the device stays silent.
    AdvertisingSkipped(LinkError),
}
