//! Hall sensor driver: the device-wide shared state, the ISR entry point,
//! and the pin as an `embedded-hal` input.
//!
//! ## Hardware
//!
//! Open-drain hall switch with the internal pull-up enabled.  A magnet pulls
//! the line LOW.  The GPIO interrupt fires on both edges; the ISR service
//! dispatches it to [`hall_isr_handler`].

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin};

use crate::app::shared::SharedState;
use crate::drivers::hw_init;
use crate::hall::{EdgeDetector, EdgeEventPort};
use crate::pins;

/// Signal, connection slot and published value shared by the ISR, the radio
/// callbacks and the worker thread.
pub static SHARED: SharedState = SharedState::new();

/// The ESP-IDF GPIO ISR service clears the pin's interrupt status itself
/// and only dispatches to this handler for the hall pin, so by the time we
/// run the event is already acknowledged.
struct IsrServiceLatch;

impl EdgeEventPort for IsrServiceLatch {
    fn check_and_clear(&mut self) -> bool {
        true
    }
}

/// ISR handler, registered on the hall GPIO for both edges.
/// Safe to call from interrupt context (no allocation, no blocking).
pub fn hall_isr_handler() {
    EdgeDetector::new(&SHARED.signal).on_interrupt(&mut IsrServiceLatch);
}

/// The hall GPIO as an input pin.
pub struct HallPin {
    gpio: i32,
}

impl HallPin {
    pub fn new() -> Self {
        Self {
            gpio: pins::HALL_SENSOR_GPIO,
        }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }
}

impl Default for HallPin {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorType for HallPin {
    type Error = Infallible;
}

impl InputPin for HallPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(hw_init::gpio_read(self.gpio))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!hw_init::gpio_read(self.gpio))
    }
}
