//! Peripheral drivers and hardware initialisation.

pub mod hall;
pub mod hw_init;
pub mod indicator;
pub mod task_pin;
