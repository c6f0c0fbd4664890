//! Interrupt-driven square-wave tone engine.
//!
//! A single periodic hardware timer fires at twice the requested frequency;
//! each firing performs exactly one O(1) action — toggle the piezo output
//! pin. A full toggle pair reproduces one cycle at the requested frequency.
//!
//! The timer period is derived through the classic 8-bit compare-threshold
//! formula:
//!
//! ```text
//! T = clock / (2 × prescaler × freq) − 1,   clamped to 1..=255
//! ```
//!
//! Clamping silently degrades accuracy for frequencies outside the clean
//! range instead of failing; in the calibration sweep band the divergence
//! stays under 2 %, inaudible for an alerting tone.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: an `esp_timer` periodic callback toggles the GPIO.
//! On host/test: [`ToneEngine::simulate_compare_match`] stands in for the
//! timer callback with the same single-writer toggle contract.

use crate::config::{THRESHOLD_MAX, THRESHOLD_MIN, TIMER_CLOCK_HZ, TIMER_PRESCALER};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Threshold arithmetic ──────────────────────────────────────

/// Compare threshold for `freq_hz`, clamped to the 8-bit register range.
///
/// Callers must guard `freq_hz == 0` before calling (the public
/// [`ToneEngine::start`] does).
pub fn compare_threshold(freq_hz: u16) -> u8 {
    debug_assert!(freq_hz > 0);
    let raw = TIMER_CLOCK_HZ / (2 * TIMER_PRESCALER * u32::from(freq_hz));
    raw.saturating_sub(1)
        .clamp(u32::from(THRESHOLD_MIN), u32::from(THRESHOLD_MAX)) as u8
}

/// Interval between compare matches (µs) for a programmed threshold.
/// Each match toggles the pin once, so the output period is twice this.
pub fn toggle_interval_us(threshold: u8) -> u64 {
    (u64::from(threshold) + 1) * u64::from(TIMER_PRESCALER) * 1_000_000
        / u64::from(TIMER_CLOCK_HZ)
}

/// Actual output frequency (Hz) produced by a programmed threshold.
pub fn actual_freq_hz(threshold: u8) -> u32 {
    TIMER_CLOCK_HZ / (2 * TIMER_PRESCALER * (u32::from(threshold) + 1))
}

// ── ESP-IDF timer plumbing ────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut TONE_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// Driven level of the piezo pin. Written by the timer callback (single
/// writer while the timer runs) and reset by `stop()` only after the timer
/// has been stopped.
#[cfg(target_os = "espidf")]
static OUTPUT_LEVEL: AtomicBool = AtomicBool::new(false);

/// SAFETY: TONE_TIMER is written once in `ToneEngine::new()` from the
/// single main-task context before any start/stop call.
#[cfg(target_os = "espidf")]
unsafe fn tone_timer() -> esp_timer_handle_t {
    unsafe { TONE_TIMER }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn compare_match_cb(_arg: *mut core::ffi::c_void) {
    // Exactly one action: XOR the driven level and write it out. No
    // counters, no buffering — worst-case latency stays flat at several
    // kHz of callback rate.
    let high = !OUTPUT_LEVEL.fetch_xor(true, Ordering::Relaxed);
    hw_init::gpio_write(pins::BUZZER_GPIO, high);
}

// ── ToneEngine ────────────────────────────────────────────────

pub struct ToneEngine {
    running: bool,
    threshold: u8,
    #[cfg(target_os = "espidf")]
    created: bool,
    #[cfg(not(target_os = "espidf"))]
    pin_high: bool,
}

impl ToneEngine {
    /// Create the engine and (on target) the periodic timer, once at boot.
    pub fn new() -> Self {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: TONE_TIMER is written here once at boot from the
            // single main-task context, before any callback can fire.
            let created = unsafe {
                let args = esp_timer_create_args_t {
                    callback: Some(compare_match_cb),
                    arg: core::ptr::null_mut(),
                    dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
                    name: c"tone".as_ptr(),
                    skip_unhandled_events: true,
                };
                let ret = esp_timer_create(&args, &raw mut TONE_TIMER);
                if ret != ESP_OK {
                    log::error!("tone: timer create failed (rc={ret}) — device stays silent");
                }
                ret == ESP_OK
            };
            Self {
                running: false,
                threshold: 0,
                created,
            }
        }

        #[cfg(not(target_os = "espidf"))]
        Self {
            running: false,
            threshold: 0,
            pin_high: false,
        }
    }

    /// Start (or retune) the square wave at `freq_hz`.
    ///
    /// Zero is a no-op — it guards the division in the threshold formula.
    /// Calling again while running reprograms the period; no toggle-phase
    /// guarantee is made across the change.
    pub fn start(&mut self, freq_hz: u16) {
        if freq_hz == 0 {
            return;
        }
        let threshold = compare_threshold(freq_hz);
        self.threshold = threshold;

        #[cfg(target_os = "espidf")]
        {
            if !self.created {
                return;
            }
            // SAFETY: timer handle valid (created flag); main-task only.
            unsafe {
                let t = tone_timer();
                if self.running {
                    esp_timer_stop(t);
                }
                let ret = esp_timer_start_periodic(t, toggle_interval_us(threshold));
                if ret != ESP_OK {
                    log::error!("tone: timer start failed (rc={ret})");
                    return;
                }
            }
        }

        self.running = true;
    }

    /// Silence the output: stop the timer, then force the pin low.
    /// Deterministic regardless of toggle phase; idempotent.
    pub fn stop(&mut self) {
        #[cfg(target_os = "espidf")]
        {
            if self.created {
                // SAFETY: main-task only; stopping an already-stopped timer
                // returns ESP_ERR_INVALID_STATE, which is fine here.
                unsafe {
                    esp_timer_stop(tone_timer());
                }
            }
            // The callback cannot fire past this point, so the level reset
            // cannot race with a toggle.
            OUTPUT_LEVEL.store(false, Ordering::Relaxed);
            hw_init::gpio_write(pins::BUZZER_GPIO, false);
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.pin_high = false;
        }

        self.running = false;
    }

    /// Whether the periodic toggle is active.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Last programmed compare threshold.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Current driven level of the piezo pin (simulation backend).
    #[cfg(not(target_os = "espidf"))]
    pub fn output_high(&self) -> bool {
        self.pin_high
    }

    /// Simulate one timer compare match: a single pin toggle, exactly what
    /// the hardware callback does. Fires only while the timer runs.
    #[cfg(not(target_os = "espidf"))]
    pub fn simulate_compare_match(&mut self) {
        if self.running {
            self.pin_high = !self.pin_high;
        }
    }
}
