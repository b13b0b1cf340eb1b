//! Power regulation setup.
//!
//! The notifier never scales its clock and never enters automatic light
//! sleep, so dynamic frequency scaling is pinned off at boot: minimum and
//! maximum CPU frequency are both the default and light sleep is disabled.
//! Builds without `CONFIG_PM_ENABLE` report `ESP_ERR_NOT_SUPPORTED`, which
//! means there is nothing to turn off.

use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerSetup {
    /// Frequency scaling and auto light sleep are now off.
    Pinned,
    /// Power management is not compiled in.
    NotSupported,
    /// The driver rejected the configuration (`esp_err_t`).
    Rejected(i32),
}

#[cfg(target_os = "espidf")]
pub fn disable_dynamic_regulation() -> PowerSetup {
    use esp_idf_svc::sys::*;

    let freq = CONFIG_ESP_DEFAULT_CPU_FREQ_MHZ as i32;
    let cfg = esp_pm_config_t {
        max_freq_mhz: freq,
        min_freq_mhz: freq,
        light_sleep_enable: false,
    };
    // SAFETY: esp_pm_configure copies the config before returning.
    let ret = unsafe { esp_pm_configure(&cfg as *const esp_pm_config_t as *const core::ffi::c_void) };
    let outcome = if ret == ESP_OK as i32 {
        PowerSetup::Pinned
    } else if ret == ESP_ERR_NOT_SUPPORTED as i32 {
        PowerSetup::NotSupported
    } else {
        PowerSetup::Rejected(ret)
    };
    log_outcome(outcome);
    outcome
}

#[cfg(not(target_os = "espidf"))]
pub fn disable_dynamic_regulation() -> PowerSetup {
    log_outcome(PowerSetup::NotSupported);
    PowerSetup::NotSupported
}

fn log_outcome(outcome: PowerSetup) {
    match outcome {
        PowerSetup::Pinned => info!("power: DFS and auto light sleep disabled"),
        PowerSetup::NotSupported => debug!("power: PM not enabled, nothing to disable"),
        PowerSetup::Rejected(rc) => warn!("power: esp_pm_configure rejected (rc={})", rc),
    }
}
