//! Unified error types for the SmartZipper firmware.
//!
//! A single `Error` enum that every subsystem converts into.  All variants
//! are `Copy` so they can travel through events and port results without
//! allocation.

use core::fmt;

use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The hall sensor could not be read.
    Sensor(SensorError),
    /// The radio stack rejected an operation.
    Link(LinkError),
    /// Peripheral initialisation failed.
    Init(HwInitError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// GPIO level read returned an error.
    GpioReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// Controller or host stack bring-up failed (esp_err_t code).
    StackInitFailed(i32),
    /// Advertising could not be started.
    AdvertisingFailed(i32),
    /// The notify primitive rejected the send.
    NotifyFailed(i32),
    /// The attribute table has not finished registering.
    AttributeUnavailable,
    /// Payload larger than the attribute value.
    PayloadTooLong,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackInitFailed(rc) => write!(f, "BLE stack init failed (rc={rc})"),
            Self::AdvertisingFailed(rc) => write!(f, "advertising start failed (rc={rc})"),
            Self::NotifyFailed(rc) => write!(f, "notify failed (rc={rc})"),
            Self::AttributeUnavailable => write!(f, "attribute not registered"),
            Self::PayloadTooLong => write!(f, "payload exceeds attribute length"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
