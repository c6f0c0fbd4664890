//! FcBuzzer Firmware — Main Entry Point
//!
//! Boot sequence:
//!
//! 1. GPIO init — piezo output driven low, FC signal input pulled up.
//! 2. Arm the task watchdog (sole hang-recovery mechanism).
//! 3. Load the calibrated frequency from NVS (default on any invalid record).
//! 4. Settle, then sample the signal line exactly once:
//!    held active → calibration sweep (never returns),
//!    idle        → startup signature, then the normal polling loop.

#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use fcbuzzer::adapters::hardware::HardwareAdapter;
use fcbuzzer::adapters::log_sink::LogEventSink;
use fcbuzzer::adapters::nvs::NvsAdapter;
use fcbuzzer::app::calibration::Calibrator;
use fcbuzzer::app::controller::{BuzzerController, OperatingMode};
use fcbuzzer::app::pacing;
use fcbuzzer::app::ports::FrequencyStore;
use fcbuzzer::config::STARTUP_SETTLE_MS;
use fcbuzzer::drivers::tone::ToneEngine;
use fcbuzzer::drivers::watchdog::Watchdog;
use fcbuzzer::drivers::hw_init;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!("FcBuzzer v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Pins + watchdog ────────────────────────────────────
    if let Err(e) = hw_init::init_gpio() {
        // Pin init failure is critical — log and halt; the watchdog is not
        // armed yet, so the device stays down rather than chattering.
        log::error!("GPIO init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let mut watchdog = Watchdog::new();

    // ── 3. Persistent frequency ───────────────────────────────
    let mut nvs = NvsAdapter::new().unwrap_or_else(|e| {
        // Degraded but audible: loads report the default frequency and
        // calibration saves fail loudly in the log. NVS should self-heal
        // on the next power cycle.
        warn!("NVS init failed ({}); persistence disabled this session", e);
        NvsAdapter::default()
    });
    let freq_hz = nvs.load();
    info!("active frequency: {} Hz", freq_hz);

    // ── 4. Adapters ───────────────────────────────────────────
    let mut hw = HardwareAdapter::new(ToneEngine::new());
    let mut sink = LogEventSink::new();

    #[cfg(target_os = "espidf")]
    let mut delay = esp_idf_hal::delay::Delay::new_default();
    #[cfg(not(target_os = "espidf"))]
    let mut delay = pacing::SimDelay;

    // ── 5. Mode selection (once per power cycle) ──────────────
    pacing::rest(&mut delay, STARTUP_SETTLE_MS, &mut watchdog);
    let mode = BuzzerController::select_mode(&mut hw, &mut sink);

    match mode {
        OperatingMode::Calibration => {
            // Signal line strapped to ground at power-on. Never returns;
            // the operator powers off at the best-sounding candidate.
            Calibrator::default().run(&mut nvs, &mut hw, &mut delay, &mut watchdog, &mut sink)
        }
        OperatingMode::Normal => {
            let mut ctrl = BuzzerController::new(freq_hz);
            ctrl.startup_signature(&mut hw, &mut delay, &mut watchdog);
            ctrl.run(&mut hw, &mut delay, &mut watchdog, &mut sink)
        }
    }
}
