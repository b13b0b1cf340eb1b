//! SmartZipper Firmware — Main Entry Point
//!
//! Hexagonal architecture, interrupt driven.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   BleAdapter         LogEventSink  SettleDelay│
//! │  (BoardPort)       (Radio+LinkPort)   (EventSink)   (DelayNs)  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │      boot() · HallService (pure logic)                 │    │
//! │  │  debounce · change filter · notifier                   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  hall ISR ──▶ SHARED.signal ──▶ hall-worker thread             │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info};

use smartzipper::adapters::ble::BleAdapter;
use smartzipper::adapters::hardware::HardwareAdapter;
use smartzipper::adapters::log_sink::{banner, LogEventSink};
use smartzipper::adapters::time::SettleDelay;
use smartzipper::app::boot::boot;
use smartzipper::config::FirmwareConfig;
use smartzipper::drivers::hall::{HallPin, SHARED};
use smartzipper::drivers::indicator::Indicators;
use smartzipper::drivers::task_pin::{spawn_on_core, Core};
use smartzipper::hall::DebounceWorker;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    for row in banner(env!("CARGO_PKG_VERSION")) {
        info!("{}", row);
    }

    // ── 2. Config (compiled-in defaults) ──────────────────────
    let config = FirmwareConfig::default();
    info!("Config: {}", serde_json::to_string(&config)?);

    // ── 3. Adapters ───────────────────────────────────────────
    let mut board = HardwareAdapter::new(Indicators::new());
    let mut ble = BleAdapter::new();
    let mut sink = LogEventSink::new();
    let worker = DebounceWorker::new(HallPin::new(), SettleDelay::new(), config.settle_ms);

    // ── 4. Boot sequence ──────────────────────────────────────
    let (mut service, report) = match boot(&config, &SHARED, worker, &mut board, &mut ble, &mut sink) {
        Ok(booted) => booted,
        Err(e) => {
            // The task watchdog resets the chip.
            error!("Boot failed: {}, halting", e);
            #[allow(clippy::empty_loop)]
            loop {}
        }
    };
    info!(
        "Boot complete: hall={}, advertising={}",
        report.initial,
        if report.advertising.is_ok() { "on" } else { "off" }
    );

    // ── 5. Hall worker ────────────────────────────────────────
    let worker = spawn_on_core(
        Core::App,
        config.worker_priority,
        config.worker_stack_kb,
        "hall-worker\0",
        move || {
            service.run(&mut ble, &mut LogEventSink::new());
        },
    )?;

    if worker.join().is_err() {
        error!("hall-worker panicked, restarting");
        esp_idf_svc::hal::reset::restart();
    }
    Ok(())
}
