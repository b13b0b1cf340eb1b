//! Firmware configuration parameters
//!
//! All tunable parameters for the SmartZipper device.  Nothing is persisted:
//! the firmware always boots with [`FirmwareConfig::default()`], which is
//! logged as JSON in the boot banner.

use serde::{Deserialize, Serialize};

/// Longest device name that still fits the advertising payload next to the
/// flags field.
pub const MAX_DEVICE_NAME_LEN: usize = 24;

/// BLE advertising interval bounds (0.625 ms units).
const ADV_INTERVAL_FLOOR: u16 = 0x0020;
const ADV_INTERVAL_CEIL: u16 = 0x4000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareConfig {
    // --- Advertising ---
    /// Complete local name advertised to peers
    pub device_name: heapless::String<MAX_DEVICE_NAME_LEN>,
    /// Minimum advertising interval (0.625 ms units)
    pub adv_interval_min: u16,
    /// Maximum advertising interval (0.625 ms units)
    pub adv_interval_max: u16,

    // --- Debounce ---
    /// Settle delay between an edge and the re-sample (milliseconds)
    pub settle_ms: u32,

    // --- Worker task ---
    /// Stack size of the debounce worker thread (KiB)
    pub worker_stack_kb: usize,
    /// FreeRTOS priority of the debounce worker thread
    pub worker_priority: u8,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        let mut device_name = heapless::String::new();
        // Fits: "SmartZipper" is 11 bytes.
        let _ = device_name.push_str("SmartZipper");

        Self {
            device_name,
            adv_interval_min: 0x0640, // 1 s
            adv_interval_max: 0x0C80, // 2 s

            settle_ms: 10,

            worker_stack_kb: 4,
            worker_priority: 5,
        }
    }
}

impl FirmwareConfig {
    /// Reject values the radio or the debounce logic cannot work with.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.device_name.is_empty() {
            return Err("device_name must not be empty");
        }
        if !self.device_name.is_ascii() {
            return Err("device_name must be ASCII");
        }
        if self.settle_ms == 0 {
            return Err("settle_ms must be non-zero");
        }
        let range = ADV_INTERVAL_FLOOR..=ADV_INTERVAL_CEIL;
        if !range.contains(&self.adv_interval_min) || !range.contains(&self.adv_interval_max) {
            return Err("advertising interval outside 0x0020..=0x4000");
        }
        if self.adv_interval_min > self.adv_interval_max {
            return Err("adv_interval_min exceeds adv_interval_max");
        }
        if self.worker_stack_kb == 0 {
            return Err("worker_stack_kb must be non-zero");
        }
        Ok(())
    }
}
