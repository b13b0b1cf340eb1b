//! Canonical hall sensor state and its one-byte wire encoding.
//!
//! The sensor output is open-drain with a pull-up: a nearby magnet pulls
//! the pin LOW.  [`SensorState`] mirrors the physical level; the
//! characteristic payload is inverted so that `'1'` means "magnet present".
//!
//! | Pin level | SensorState | Payload |
//! |-----------|-------------|---------|
//! | LOW       | `Low`       | `b'1'`  |
//! | HIGH      | `High`      | `b'0'`  |

use core::fmt;

/// Payload byte for a triggered sensor (magnet present).
pub const PAYLOAD_TRIGGERED: u8 = b'1';
/// Payload byte for an idle sensor (magnet absent).
pub const PAYLOAD_IDLE: u8 = b'0';

/// Debounced level of the hall sensor pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SensorState {
    /// Pin pulled low: magnet present.
    Low = 0,
    /// Pin floating high: magnet absent.
    High = 1,
}

impl SensorState {
    /// Map a raw pin level (`true` = HIGH) to a state.
    pub const fn from_level(is_high: bool) -> Self {
        if is_high { Self::High } else { Self::Low }
    }

    /// Map an `is_low()` reading, the natural query for an active-low input.
    pub const fn from_is_low(is_low: bool) -> Self {
        Self::from_level(!is_low)
    }

    /// `true` when the magnet is present.
    pub const fn is_triggered(self) -> bool {
        matches!(self, Self::Low)
    }

    /// One-byte ASCII characteristic payload.
    pub const fn payload(self) -> u8 {
        match self {
            Self::Low => PAYLOAD_TRIGGERED,
            Self::High => PAYLOAD_IDLE,
        }
    }

    /// Decode a characteristic payload byte.
    pub const fn from_payload(byte: u8) -> Option<Self> {
        match byte {
            PAYLOAD_TRIGGERED => Some(Self::Low),
            PAYLOAD_IDLE => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for SensorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "magnet-present"),
            Self::High => write!(f, "magnet-absent"),
        }
    }
}
