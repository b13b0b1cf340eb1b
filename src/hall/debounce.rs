//! Debounce worker — settle, re-sample, classify.
//!
//! Each wake runs one pass through the sampling phases:
//!
//! ```text
//!   Idle ──wake──▶ Settling ──delay──▶ Sampling ──read──▶ Sampled(state)
//!    ▲                                     │                    │
//!    └──────────── read error ─────────────┘◀─── next wake ─────┘
//! ```
//!
//! The settle delay absorbs contact/magnetic bounce: however many edges
//! arrived, only the level present after the delay is read.  The boot-time
//! sample deliberately skips the delay (see DESIGN.md, open questions).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::debug;

use super::state::SensorState;
use crate::error::SensorError;

/// Where the worker is within one wake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplePhase {
    /// Waiting for the next wake-up.
    Idle,
    /// Sleeping through the settle interval.
    Settling,
    /// Reading the pin.
    Sampling,
    /// Holding the last settled reading, to be forwarded to the filter.
    Sampled(SensorState),
}

impl SamplePhase {
    /// Legal phase transitions.
    pub const fn can_advance_to(self, next: SamplePhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle | Self::Sampled(_), Self::Settling)
                | (Self::Settling, Self::Sampling)
                | (Self::Sampling, Self::Sampled(_) | Self::Idle)
                | (Self::Idle, Self::Sampled(_))
        )
    }
}

pub struct DebounceWorker<P, D> {
    pin: P,
    delay: D,
    settle_ms: u32,
    phase: SamplePhase,
}

impl<P, D> DebounceWorker<P, D>
where
    P: InputPin,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D, settle_ms: u32) -> Self {
        Self {
            pin,
            delay,
            settle_ms,
            phase: SamplePhase::Idle,
        }
    }

    pub fn phase(&self) -> SamplePhase {
        self.phase
    }

    pub fn settle_ms(&self) -> u32 {
        self.settle_ms
    }

    /// Boot-time reading, taken synchronously with no settle delay.
    pub fn sample_initial(&mut self) -> Result<SensorState, SensorError> {
        let state = self.read()?;
        self.advance(SamplePhase::Sampled(state));
        Ok(state)
    }

    /// One wake: wait out the bounce, then read the settled level.
    pub fn settle_and_sample(&mut self) -> Result<SensorState, SensorError> {
        self.advance(SamplePhase::Settling);
        self.delay.delay_ms(self.settle_ms);

        self.advance(SamplePhase::Sampling);
        match self.read() {
            Ok(state) => {
                debug!("hall: settled sample {:?}", state);
                self.advance(SamplePhase::Sampled(state));
                Ok(state)
            }
            Err(e) => {
                self.advance(SamplePhase::Idle);
                Err(e)
            }
        }
    }

    fn read(&mut self) -> Result<SensorState, SensorError> {
        self.pin
            .is_low()
            .map(SensorState::from_is_low)
            .map_err(|_| SensorError::GpioReadFailed)
    }

    fn advance(&mut self, next: SamplePhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal sample phase transition {:?} -> {:?}",
            self.phase,
            next
        );
        self.phase = next;
    }
}
