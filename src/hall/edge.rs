//! Edge detector — the interrupt-context half of the pipeline.
//!
//! Runs inside the GPIO ISR.  It does two things only: acknowledge the
//! hardware event so the interrupt does not re-fire, and post one unit to
//! the [`EdgeSignal`].  No blocking, no allocation, no logging, no radio.

use super::signal::EdgeSignal;

/// Hardware event flag for the hall pin interrupt.
pub trait EdgeEventPort {
    /// If the pin's edge event is latched, clear it and return `true`.
    /// Returns `false` for an interrupt raised by some other source.
    fn check_and_clear(&mut self) -> bool;
}

pub struct EdgeDetector<'a> {
    signal: &'a EdgeSignal,
}

impl<'a> EdgeDetector<'a> {
    pub const fn new(signal: &'a EdgeSignal) -> Self {
        Self { signal }
    }

    /// ISR body.  Returns whether the worker was signalled.
    pub fn on_interrupt(&self, event: &mut impl EdgeEventPort) -> bool {
        if !event.check_and_clear() {
            return false;
        }
        self.signal.post();
        true
    }
}
