//! Application core — pure domain logic, zero I/O.
//!
//! The boot sequence and the hall service live here.  All interaction with
//! hardware and the radio happens through **port traits** defined in
//! [`ports`] (plus the `embedded-hal` pin and delay traits), keeping this
//! layer fully testable without real peripherals.

pub mod boot;
pub mod events;
pub mod ports;
pub mod service;
pub mod shared;
