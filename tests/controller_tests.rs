//! Integration tests: boot-time mode selection and the normal-mode loop.

use fcbuzzer::app::controller::{BuzzerController, OperatingMode};
use fcbuzzer::app::events::BuzzerEvent;
use fcbuzzer::app::ports::{
    EventSink, FrequencyStore, Heartbeat, SignalPort, StoreError, TonePort,
};
use fcbuzzer::config::{BEEP_SHORT_MS, DEFAULT_FREQ_HZ};
use embedded_hal::delay::DelayNs;

// ── Mock implementations ──────────────────────────────────────

/// Plays back a scripted signal trace; the last reading sticks.
struct ScriptedHw {
    trace: Vec<bool>,
    cursor: usize,
    starts: Vec<u16>,
    stops: u32,
}

impl ScriptedHw {
    fn new(trace: &[bool]) -> Self {
        Self {
            trace: trace.to_vec(),
            cursor: 0,
            starts: Vec::new(),
            stops: 0,
        }
    }
}

impl SignalPort for ScriptedHw {
    fn signal_requested(&mut self) -> bool {
        let reading = self.trace[self.cursor.min(self.trace.len() - 1)];
        self.cursor += 1;
        reading
    }
}

impl TonePort for ScriptedHw {
    fn start(&mut self, freq_hz: u16) {
        self.starts.push(freq_hz);
    }
    fn stop(&mut self) {
        self.stops += 1;
    }
}

struct CountingStore {
    saves: u32,
}

impl FrequencyStore for CountingStore {
    fn load(&self) -> u16 {
        DEFAULT_FREQ_HZ
    }
    fn save(&mut self, _freq_hz: u16) -> Result<(), StoreError> {
        self.saves += 1;
        Ok(())
    }
}

struct CaptureSink {
    events: Vec<BuzzerEvent>,
}

impl EventSink for CaptureSink {
    fn emit(&mut self, event: &BuzzerEvent) {
        self.events.push(*event);
    }
}

struct InstantDelay;
impl DelayNs for InstantDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

struct CountingHeartbeat {
    pulses: u32,
}
impl Heartbeat for CountingHeartbeat {
    fn pulse(&mut self) {
        self.pulses += 1;
    }
}

fn edge_count(trace: &[bool]) -> usize {
    trace.windows(2).filter(|w| w[0] != w[1]).count() + usize::from(trace[0])
}

// ── Mode selection ────────────────────────────────────────────

#[test]
fn strapped_line_at_boot_selects_calibration() {
    let mut hw = ScriptedHw::new(&[true]);
    let mut sink = CaptureSink { events: Vec::new() };
    let mode = BuzzerController::select_mode(&mut hw, &mut sink);
    assert_eq!(mode, OperatingMode::Calibration);
    assert_eq!(
        sink.events,
        vec![BuzzerEvent::ModeSelected(OperatingMode::Calibration)]
    );
}

#[test]
fn idle_line_at_boot_selects_normal() {
    let mut hw = ScriptedHw::new(&[false]);
    let mut sink = CaptureSink { events: Vec::new() };
    assert_eq!(
        BuzzerController::select_mode(&mut hw, &mut sink),
        OperatingMode::Normal
    );
}

// ── Startup signature ─────────────────────────────────────────

#[test]
fn startup_signature_is_two_short_beeps_at_loaded_frequency() {
    let store = CountingStore { saves: 0 };
    let ctrl = BuzzerController::new(store.load());
    let mut hw = ScriptedHw::new(&[false]);
    let mut hb = CountingHeartbeat { pulses: 0 };

    ctrl.startup_signature(&mut hw, &mut InstantDelay, &mut hb);

    assert_eq!(hw.starts, vec![DEFAULT_FREQ_HZ, DEFAULT_FREQ_HZ]);
    assert_eq!(hw.stops, 2);
    // The watchdog stays fed throughout the signature.
    assert!(hb.pulses >= 2 * BEEP_SHORT_MS / 10);
}

// ── Polling loop ──────────────────────────────────────────────

#[test]
fn tone_transitions_match_input_transitions_exactly() {
    // Redundant readings must never re-invoke start/stop: the number of
    // engine transitions equals the number of input edges, never more.
    let trace = [
        false, false, true, true, true, false, false, true, false, false,
    ];
    let mut ctrl = BuzzerController::new(2600);
    let mut hw = ScriptedHw::new(&trace);
    let mut sink = CaptureSink { events: Vec::new() };

    for _ in 0..trace.len() {
        ctrl.poll(&mut hw, &mut sink);
    }

    let transitions = hw.starts.len() + hw.stops as usize;
    assert_eq!(transitions, edge_count(&trace));
    assert_eq!(hw.starts, vec![2600, 2600]);
    assert_eq!(hw.stops, 2);
}

#[test]
fn poll_emits_events_only_on_edges() {
    let trace = [true, true, false, false];
    let mut ctrl = BuzzerController::new(2500);
    let mut hw = ScriptedHw::new(&trace);
    let mut sink = CaptureSink { events: Vec::new() };

    for _ in 0..trace.len() {
        ctrl.poll(&mut hw, &mut sink);
    }

    assert_eq!(
        sink.events,
        vec![BuzzerEvent::ToneStarted(2500), BuzzerEvent::ToneStopped]
    );
}

// ── End-to-end normal boot ────────────────────────────────────

#[test]
fn fresh_device_boots_normal_and_tracks_input_without_persisting() {
    // Persistent store never written → loads the compiled-in default.
    let store = CountingStore { saves: 0 };
    let freq = store.load();
    assert_eq!(freq, DEFAULT_FREQ_HZ);

    // Calibration strap not present → normal mode.
    let trace = [false, true, true, false, true, false];
    let mut hw = ScriptedHw::new(&trace);
    let mut sink = CaptureSink { events: Vec::new() };
    let mode = BuzzerController::select_mode(&mut hw, &mut sink);
    assert_eq!(mode, OperatingMode::Normal);

    // Two short beeps at the default frequency.
    let mut ctrl = BuzzerController::new(freq);
    let mut hb = CountingHeartbeat { pulses: 0 };
    ctrl.startup_signature(&mut hw, &mut InstantDelay, &mut hb);
    assert_eq!(hw.starts, vec![DEFAULT_FREQ_HZ, DEFAULT_FREQ_HZ]);

    // Then the tone mirrors the line 1:1...
    hw.starts.clear();
    hw.stops = 0;
    for _ in 1..trace.len() {
        ctrl.poll(&mut hw, &mut sink);
    }
    assert_eq!(hw.starts.len(), 2);
    assert_eq!(hw.stops, 2);

    // ...and nothing is ever persisted in normal mode.
    assert_eq!(store.saves, 0);
}
