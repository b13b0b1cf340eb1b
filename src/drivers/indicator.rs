//! Indicator LED driver.
//!
//! Two discrete LEDs on plain GPIO outputs.  The firmware never lights
//! them; they are parked LOW at boot so they draw no current.
//!
//! On ESP-IDF: drives the pins through hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init::{self, HwInitError};
use crate::pins;

pub struct Indicators {
    lit: [bool; pins::INDICATOR_GPIOS.len()],
}

impl Indicators {
    pub fn new() -> Self {
        Self {
            lit: [false; pins::INDICATOR_GPIOS.len()],
        }
    }

    /// Configure the outputs and drive them all LOW.
    pub fn init(&mut self) -> Result<(), HwInitError> {
        hw_init::init_indicator_outputs()?;
        self.all_off();
        Ok(())
    }

    fn set(&mut self, index: usize, on: bool) {
        if let Some(&gpio) = pins::INDICATOR_GPIOS.get(index) {
            hw_init::gpio_write(gpio, on);
            self.lit[index] = on;
        }
    }

    pub fn all_off(&mut self) {
        for i in 0..self.lit.len() {
            self.set(i, false);
        }
    }

    pub fn any_lit(&self) -> bool {
        self.lit.iter().any(|&on| on)
    }
}

impl Default for Indicators {
    fn default() -> Self {
        Self::new()
    }
}
