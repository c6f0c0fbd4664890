//! Main controller — boot-time mode selection and the normal-mode loop.
//!
//! Operating mode, the current frequency, and the sound-on flag are
//! explicit fields of [`BuzzerController`] threaded through the boot and
//! loop routines; there is no ambient shared state.

use embedded_hal::delay::DelayNs;
use log::info;

use crate::config::{
    BEEP_SHORT_MS, PAUSE_SHORT_MS, POLL_DELAY_US, POST_SIGNATURE_SETTLE_MS,
};

use super::events::BuzzerEvent;
use super::pacing::{beep, rest};
use super::ports::{EventSink, Heartbeat, SignalPort, TonePort};

/// Boot-time operating mode, decided exactly once per power cycle.
///
/// There is no way back from [`Calibration`](OperatingMode::Calibration)
/// except removing power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    Calibration,
    Normal,
}

/// Owns the normal-mode state: current frequency and whether a tone is
/// playing.
pub struct BuzzerController {
    freq_hz: u16,
    sound_on: bool,
}

impl BuzzerController {
    /// Construct with the frequency loaded from the persistent store.
    pub fn new(freq_hz: u16) -> Self {
        Self {
            freq_hz,
            sound_on: false,
        }
    }

    /// Currently active frequency (Hz).
    pub fn frequency(&self) -> u16 {
        self.freq_hz
    }

    /// Whether a tone is currently playing.
    pub fn sound_on(&self) -> bool {
        self.sound_on
    }

    // ── Boot ──────────────────────────────────────────────────

    /// Sample the signal line exactly once and decide the operating mode.
    ///
    /// The line doubles as the calibration-entry strap: held active (shorted
    /// to ground) at power-on means calibration. The decision is immutable
    /// for the remainder of the power cycle.
    pub fn select_mode(signal: &mut impl SignalPort, sink: &mut impl EventSink) -> OperatingMode {
        let mode = if signal.signal_requested() {
            OperatingMode::Calibration
        } else {
            OperatingMode::Normal
        };
        sink.emit(&BuzzerEvent::ModeSelected(mode));
        mode
    }

    /// Two short beeps at the active frequency, confirming the firmware is
    /// alive and which frequency it loaded.
    pub fn startup_signature<D: DelayNs>(
        &self,
        tone: &mut impl TonePort,
        delay: &mut D,
        heartbeat: &mut impl Heartbeat,
    ) {
        info!("startup signature at {} Hz", self.freq_hz);
        beep(tone, self.freq_hz, BEEP_SHORT_MS, delay, heartbeat);
        rest(delay, PAUSE_SHORT_MS, heartbeat);
        beep(tone, self.freq_hz, BEEP_SHORT_MS, delay, heartbeat);
        rest(delay, POST_SIGNATURE_SETTLE_MS, heartbeat);
    }

    // ── Normal mode ───────────────────────────────────────────

    /// One polling iteration: mirror the signal line onto the tone engine.
    ///
    /// Starts or stops the tone only on transition edges — an unchanged
    /// reading never re-invokes `start`/`stop`. Returns `true` when a
    /// transition occurred.
    pub fn poll(
        &mut self,
        hw: &mut (impl SignalPort + TonePort),
        sink: &mut impl EventSink,
    ) -> bool {
        let requested = hw.signal_requested();
        if requested && !self.sound_on {
            hw.start(self.freq_hz);
            self.sound_on = true;
            sink.emit(&BuzzerEvent::ToneStarted(self.freq_hz));
            true
        } else if !requested && self.sound_on {
            hw.stop();
            self.sound_on = false;
            sink.emit(&BuzzerEvent::ToneStopped);
            true
        } else {
            false
        }
    }

    /// The device's steady-state behaviour: poll, feed the watchdog, rest.
    /// Never returns.
    pub fn run<D: DelayNs>(
        &mut self,
        hw: &mut (impl SignalPort + TonePort),
        delay: &mut D,
        heartbeat: &mut impl Heartbeat,
        sink: &mut impl EventSink,
    ) -> ! {
        info!("entering normal loop at {} Hz", self.freq_hz);
        loop {
            self.poll(hw, sink);
            heartbeat.pulse();
            delay.delay_us(POLL_DELAY_US);
        }
    }
}
