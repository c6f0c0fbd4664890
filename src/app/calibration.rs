//! Calibration sweep — button-free resonance discovery.
//!
//! Entered once at boot when the signal line is strapped to ground; never
//! exits except by power removal. Each sweep candidate is committed to the
//! persistent store **before** it is sounded, so the operator selects the
//! best tone by simply cutting power the moment they hear it — no confirm
//! input exists or is needed.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::config::{
    BEEP_LONG_MS, CALIB_ENTRY_SETTLE_MS, CALIB_PAUSE_MS, CALIB_TONE_MS, DEFAULT_FREQ_HZ,
    PAUSE_LONG_MS, SWEEP_MAX_HZ, SWEEP_MIN_HZ, SWEEP_REST_MS, SWEEP_STEP_HZ,
};

use super::events::BuzzerEvent;
use super::pacing::{beep, rest};
use super::ports::{EventSink, FrequencyStore, Heartbeat, StoreError, TonePort};

/// Sweep policy plus the in-memory current frequency.
///
/// Range and step are constructor parameters rather than hard-wired so a
/// build fitting a different piezo element only touches `config.rs`.
pub struct Calibrator {
    sweep_min_hz: u16,
    sweep_max_hz: u16,
    sweep_step_hz: u16,
    tone_ms: u32,
    pause_ms: u32,
    current_hz: u16,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::new(
            SWEEP_MIN_HZ,
            SWEEP_MAX_HZ,
            SWEEP_STEP_HZ,
            CALIB_TONE_MS,
            CALIB_PAUSE_MS,
        )
    }
}

impl Calibrator {
    pub fn new(
        sweep_min_hz: u16,
        sweep_max_hz: u16,
        sweep_step_hz: u16,
        tone_ms: u32,
        pause_ms: u32,
    ) -> Self {
        Self {
            sweep_min_hz,
            sweep_max_hz,
            sweep_step_hz,
            tone_ms,
            pause_ms,
            current_hz: DEFAULT_FREQ_HZ,
        }
    }

    /// Candidate frequencies in sweep order (inclusive bounds).
    pub fn candidates(&self) -> impl Iterator<Item = u16> + '_ {
        (self.sweep_min_hz..=self.sweep_max_hz).step_by(usize::from(self.sweep_step_hz))
    }

    /// In-memory mirror of the most recently persisted candidate. Kept for
    /// consistency with the normal-mode controller; the store already holds
    /// the authoritative value.
    pub fn current_frequency(&self) -> u16 {
        self.current_hz
    }

    /// Two long beeps at the default frequency confirm calibration mode
    /// audibly, followed by a settling pause.
    pub fn entry_signature<D: DelayNs>(
        &self,
        tone: &mut impl TonePort,
        delay: &mut D,
        heartbeat: &mut impl Heartbeat,
    ) {
        info!("calibration mode entered");
        beep(tone, DEFAULT_FREQ_HZ, BEEP_LONG_MS, delay, heartbeat);
        rest(delay, PAUSE_LONG_MS, heartbeat);
        beep(tone, DEFAULT_FREQ_HZ, BEEP_LONG_MS, delay, heartbeat);
        rest(delay, CALIB_ENTRY_SETTLE_MS, heartbeat);
    }

    /// One full sweep pass over all candidates.
    ///
    /// Invariant: for every candidate, `save` completes before the tone
    /// starts. The value is readable via [`FrequencyStore::load`] the
    /// moment the tone begins — powering off mid-tone keeps it.
    pub fn sweep_once<D: DelayNs>(
        &mut self,
        store: &mut impl FrequencyStore,
        tone: &mut impl TonePort,
        delay: &mut D,
        heartbeat: &mut impl Heartbeat,
        sink: &mut impl EventSink,
    ) -> Result<(), StoreError> {
        let candidates: Vec<u16> = self.candidates().collect();
        for freq in candidates {
            store.save(freq)?;
            self.current_hz = freq;
            sink.emit(&BuzzerEvent::CandidateSaved(freq));
            beep(tone, freq, self.tone_ms, delay, heartbeat);
            rest(delay, self.pause_ms, heartbeat);
        }
        Ok(())
    }

    /// The calibration loop: entry signature, then sweep forever. The only
    /// exit is external power removal with the chosen candidate already
    /// persisted.
    pub fn run<D: DelayNs>(
        &mut self,
        store: &mut impl FrequencyStore,
        tone: &mut impl TonePort,
        delay: &mut D,
        heartbeat: &mut impl Heartbeat,
        sink: &mut impl EventSink,
    ) -> ! {
        self.entry_signature(tone, delay, heartbeat);
        loop {
            if let Err(e) = self.sweep_once(store, tone, delay, heartbeat, sink) {
                // No error channel exists on this device; keep sweeping so
                // the operator still hears candidates.
                warn!("calibration: persist failed ({e}), restarting sweep");
            }
            rest(delay, SWEEP_REST_MS, heartbeat);
        }
    }
}
