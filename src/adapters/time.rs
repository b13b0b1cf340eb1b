//! Settle delay adapter.
//!
//! Implements `embedded_hal::delay::DelayNs` for the debounce worker.
//!
//! - **`target_os = "espidf"`** — `esp_idf_hal::delay::FreeRtos`, which
//!   yields to the scheduler for millisecond waits (rounded up to whole
//!   ticks).
//! - **`not(target_os = "espidf")`** — `std::thread::sleep` for host-side
//!   testing and simulation.

use embedded_hal::delay::DelayNs;

/// Blocking delay that yields the CPU while waiting.
#[derive(Debug, Default, Clone, Copy)]
pub struct SettleDelay;

impl SettleDelay {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "espidf")]
impl DelayNs for SettleDelay {
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::FreeRtos.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for SettleDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}
