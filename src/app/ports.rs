//! Port traits: the hexagonal boundary between the hall pipeline and the
//! platform.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ HallService / boot (domain)
//! ```
//!
//! Driven adapters (radio, board, event sinks) implement these traits.  The
//! pin and the settle delay are not listed here: they come in through the
//! `embedded-hal` `InputPin` and `DelayNs` traits.

use crate::drivers::hw_init::HwInitError;
use crate::error::LinkError;
use crate::link::ConnHandle;

// ───────────────────────────────────────────────────────────────
// Link port (domain → radio, per-event)
// ───────────────────────────────────────────────────────────────

/// Logical attributes the core may address.  Adapters map these to their
/// stack-specific attribute handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// The single-byte hall state characteristic.
    HallState,
}

/// Push-style delivery to a connected peer.
pub trait LinkPort {
    /// Send `payload` as an unacknowledged notification of `attr` on `conn`.
    fn notify(&mut self, conn: &ConnHandle, attr: Attribute, payload: &[u8])
    -> Result<(), LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Radio port (domain → radio, boot-time lifecycle)
// ───────────────────────────────────────────────────────────────

/// Advertising parameters handed to the radio at boot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertisingParams<'a> {
    /// Complete local name.
    pub name: &'a str,
    /// Minimum advertising interval, 0.625 ms units.
    pub interval_min: u16,
    /// Maximum advertising interval, 0.625 ms units.
    pub interval_max: u16,
    /// Accept connections.
    pub connectable: bool,
    /// LE General Discoverable flag.
    pub discoverable: bool,
}

pub trait RadioPort {
    /// Bring up the controller and host stack and register the service
    /// table.
    fn enable(&mut self) -> Result<(), LinkError>;

    /// Start advertising.  Only called after a successful [`enable`].
    ///
    /// [`enable`]: RadioPort::enable
    fn start_advertising(&mut self, params: &AdvertisingParams<'_>) -> Result<(), LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Board port (domain → GPIO / power registers, boot-time)
// ───────────────────────────────────────────────────────────────

pub trait BoardPort {
    /// Turn off power-regulation features the device does not use.
    fn disable_power_regulation(&mut self);

    /// Drive every indicator output to its off level.
    fn indicators_off(&mut self) -> Result<(), HwInitError>;

    /// Configure the hall pin (input, pull-up) and arm its edge interrupt.
    fn configure_hall_interrupt(&mut self) -> Result<(), HwInitError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
