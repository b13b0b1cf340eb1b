//! SmartZipper firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the
//! platform layers for the binary.  All ESP-IDF-specific code is guarded
//! by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod hall;
pub mod link;
pub mod pins;
pub mod power;

// Platform layers; each carries host simulation stubs.
pub mod adapters;
pub mod drivers;
