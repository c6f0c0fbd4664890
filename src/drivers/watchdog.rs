//! Task Watchdog Timer (TWDT) driver.
//!
//! The sole hang-recovery mechanism on this device: if the main loop stalls
//! for more than [`WATCHDOG_TIMEOUT_MS`](crate::config::WATCHDOG_TIMEOUT_MS), the chip resets and re-runs the
//! full boot sequence including mode selection. Every loop iteration, in
//! both modes, must call [`Watchdog::feed`] (directly or through the
//! [`Heartbeat`] port) faster than the timeout.

use crate::app::ports::Heartbeat;

#[cfg(target_os = "espidf")]
use crate::config::WATCHDOG_TIMEOUT_MS;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    pub fn new() -> Self {
        #[cfg(target_os = "espidf")]
        {
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms: WATCHDOG_TIMEOUT_MS,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!(
                        "TWDT reconfigure returned {} (may already be configured)",
                        ret
                    );
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK;
                if subscribed {
                    info!(
                        "Watchdog: subscribed ({} ms timeout, panic on trigger)",
                        WATCHDOG_TIMEOUT_MS
                    );
                } else {
                    log::warn!("Watchdog: failed to subscribe ({})", ret);
                }

                Self { subscribed }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("Watchdog(sim): no-op");
            Self {}
        }
    }

    /// Feed the watchdog. Must be called at least every
    /// [`WATCHDOG_TIMEOUT_MS`](crate::config::WATCHDOG_TIMEOUT_MS) milliseconds.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }
}

impl Heartbeat for Watchdog {
    fn pulse(&mut self) {
        self.feed();
    }
}
