//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production).  Also used from the
//! BLE callbacks, so it carries no state.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

const BANNER_WIDTH: usize = 38;

/// Boot banner: a box around the firmware name and `version`.  Versions too
/// long for the box widen every row together.
pub fn banner(version: &str) -> [String; 3] {
    let title = format!("  SmartZipper v{}", version);
    let width = BANNER_WIDTH.max(title.chars().count() + 1);
    let rule = "═".repeat(width);
    [
        format!("╔{}╗", rule),
        format!("║{:<width$}║", title, width = width),
        format!("╚{}╝", rule),
    ]
}

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Booted { initial } => {
                info!("BOOT  | initial={} ('{}')", initial, char::from(initial.payload()));
            }
            AppEvent::StateChanged { from, to } => {
                info!("HALL  | {} -> {}", from, to);
            }
            AppEvent::Notified { state, conn_id } => {
                info!("NOTIFY| '{}' -> conn {}", char::from(state.payload()), conn_id);
            }
            AppEvent::NotifyDropped { state } => {
                info!("NOTIFY| '{}' dropped, no peer", char::from(state.payload()));
            }
            AppEvent::NotifyFailed { state, error } => {
                warn!("NOTIFY| '{}' failed: {}", char::from(state.payload()), error);
            }
            AppEvent::PeerConnected { conn_id } => {
                info!("LINK  | up conn={}", conn_id);
            }
            AppEvent::PeerDisconnected { conn_id } => {
                info!("LINK  | down conn={}", conn_id);
            }
            AppEvent::AdvertisingStarted => {
                info!("ADV   | started");
            }
            AppEvent::AdvertisingSkipped(e) => {
                warn!("ADV   | skipped: {}", e);
            }
        }
    }
}
