//! One-shot GPIO initialisation.
//!
//! Configures the piezo output (driven, initially low) and the
//! flight-controller signal input (pull-up, so an unconnected line reads
//! "silence requested"). Called once from `main()` before anything else
//! touches the pins.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
        }
    }
}

// ── Init ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_gpio() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        // Piezo output: driven, no bias, starts low (silent).
        let out_cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pins::BUZZER_GPIO,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = gpio_config(&out_cfg);
        if ret != ESP_OK {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        gpio_set_level(pins::BUZZER_GPIO, 0);

        // FC signal input: active-low, pulled up so a floating line is idle.
        let in_cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pins::SIGNAL_GPIO,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = gpio_config(&in_cfg);
        if ret != ESP_OK {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }
    info!("hw_init: buzzer out + signal in configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_gpio() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): GPIO init skipped");
    Ok(())
}

// ── Register-level helpers ────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe from any context.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Simulation: inputs read high, i.e. the pulled-up idle level.
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // the write is atomic at the register level, which is what lets the
    // tone callback toggle it without locking.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}
