//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions, pulls and the hall edge interrupt using raw
//! ESP-IDF sys calls.  Called once from the boot sequence before the worker
//! starts.  On host targets every function is a logged no-op and pin reads
//! return the pulled-up idle level.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    IsrHandlerAddFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrHandlerAddFailed(rc) => write!(f, "GPIO ISR handler add failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

// ── GPIO Outputs (indicators) ─────────────────────────────────

/// Configure every indicator pin as a push-pull output driven LOW.
#[cfg(target_os = "espidf")]
pub fn init_indicator_outputs() -> Result<(), HwInitError> {
    for &pin in &pins::INDICATOR_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        // SAFETY: boot path only, before the worker or radio tasks exist.
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        gpio_write(pin, false);
    }
    info!("hw_init: indicator outputs configured (off)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_indicator_outputs() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): indicators {:?} off", pins::INDICATOR_GPIOS);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── GPIO Input (hall sensor) ──────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access; safe from any
    // context, including the ISR.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Host simulation: the pulled-up pin floats HIGH (no magnet).
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

/// Hall pin: input, internal pull-up, interrupt on both edges.
#[cfg(target_os = "espidf")]
pub fn init_hall_input() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::HALL_SENSOR_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_ANYEDGE,
    };
    // SAFETY: boot path only.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    info!("hw_init: hall input configured (GPIO{}, pull-up, any edge)", pins::HALL_SENSOR_GPIO);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_hall_input() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): hall input GPIO{} skipped", pins::HALL_SENSOR_GPIO);
    Ok(())
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn hall_gpio_isr(_arg: *mut core::ffi::c_void) {
    crate::drivers::hall::hall_isr_handler();
}

/// Install the per-pin GPIO ISR service and arm the hall interrupt.
/// Call after `init_hall_input()`.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed.  The registered handler only posts to
    // the edge signal.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        let ret = gpio_isr_handler_add(
            pins::HALL_SENSOR_GPIO,
            Some(hall_gpio_isr),
            core::ptr::null_mut(),
        );
        if ret != ESP_OK as i32 {
            return Err(HwInitError::IsrHandlerAddFailed(ret));
        }
        gpio_intr_enable(pins::HALL_SENSOR_GPIO);
    }
    info!("hw_init: ISR service installed (hall)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
