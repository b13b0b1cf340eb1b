//! Hardware adapter — bridges the board's boot-time peripherals to
//! [`BoardPort`].
//!
//! Owns the indicator driver and runs the power and GPIO setup through
//! the drivers layer.  On non-espidf targets, the underlying drivers use
//! cfg-gated simulation stubs.

use log::debug;

use crate::app::ports::BoardPort;
use crate::drivers::hw_init::{self, HwInitError};
use crate::drivers::indicator::Indicators;
use crate::power::{self, PowerSetup};

/// Concrete adapter that combines the board setup behind [`BoardPort`].
pub struct HardwareAdapter {
    indicators: Indicators,
    power: Option<PowerSetup>,
}

impl HardwareAdapter {
    pub fn new(indicators: Indicators) -> Self {
        Self {
            indicators,
            power: None,
        }
    }

    /// Outcome of the power step, once it has run.
    pub fn power_setup(&self) -> Option<PowerSetup> {
        self.power
    }

    pub fn indicators(&self) -> &Indicators {
        &self.indicators
    }
}

impl BoardPort for HardwareAdapter {
    fn disable_power_regulation(&mut self) {
        self.power = Some(power::disable_dynamic_regulation());
    }

    fn indicators_off(&mut self) -> Result<(), HwInitError> {
        self.indicators.init()
    }

    fn configure_hall_interrupt(&mut self) -> Result<(), HwInitError> {
        hw_init::init_hall_input()?;
        hw_init::init_isr_service()?;
        debug!("hardware: hall interrupt armed");
        Ok(())
    }
}
