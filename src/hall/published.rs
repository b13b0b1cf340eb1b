//! Current sensor value as seen by peer read requests.
//!
//! The worker is the only writer.  GATT read callbacks run in the radio
//! stack's task and load the byte directly; a notify is never required for
//! a reconnecting peer to learn the current state.

use core::sync::atomic::{AtomicU8, Ordering};

use super::state::SensorState;

pub struct PublishedState {
    payload: AtomicU8,
}

impl PublishedState {
    /// Before the boot sample the slot reads as idle (`'0'`).
    pub const fn new() -> Self {
        Self {
            payload: AtomicU8::new(SensorState::High.payload()),
        }
    }

    pub fn store(&self, state: SensorState) {
        self.payload.store(state.payload(), Ordering::Release);
    }

    pub fn load(&self) -> SensorState {
        SensorState::from_payload(self.payload()).unwrap_or(SensorState::High)
    }

    /// Raw one-byte characteristic value.
    pub fn payload(&self) -> u8 {
        self.payload.load(Ordering::Acquire)
    }
}

impl Default for PublishedState {
    fn default() -> Self {
        Self::new()
    }
}
