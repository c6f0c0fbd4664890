//! Property tests for the timer arithmetic, persistence acceptance rules,
//! and the edge-triggered polling contract.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;

use fcbuzzer::adapters::nvs::NvsAdapter;
use fcbuzzer::app::controller::BuzzerController;
use fcbuzzer::app::events::BuzzerEvent;
use fcbuzzer::app::ports::{EventSink, FrequencyStore, SignalPort, TonePort};
use fcbuzzer::config::{
    DEFAULT_FREQ_HZ, FREQ_ACCEPT_MAX_HZ, FREQ_ACCEPT_MIN_HZ, THRESHOLD_MAX, THRESHOLD_MIN,
};
use fcbuzzer::drivers::tone::{actual_freq_hz, compare_threshold, toggle_interval_us};

// ── Timer arithmetic ──────────────────────────────────────────

proptest! {
    #[test]
    fn threshold_always_fits_the_register(freq in 1u16..=u16::MAX) {
        let t = compare_threshold(freq);
        prop_assert!(t >= THRESHOLD_MIN);
        prop_assert!(t <= THRESHOLD_MAX);
    }

    #[test]
    fn accuracy_within_two_percent_across_accepted_band(
        freq in FREQ_ACCEPT_MIN_HZ..=FREQ_ACCEPT_MAX_HZ,
    ) {
        let actual = actual_freq_hz(compare_threshold(freq)) as f64;
        let err = (actual - f64::from(freq)).abs() / f64::from(freq);
        prop_assert!(err < 0.02, "{freq} Hz produced {actual} Hz ({err:.4} off)");
    }

    #[test]
    fn toggle_interval_is_monotone_in_threshold(a in 1u8..=254, delta in 1u8..=50) {
        let b = a.saturating_add(delta);
        prop_assert!(toggle_interval_us(a) <= toggle_interval_us(b));
    }
}

// ── Persistence acceptance ────────────────────────────────────

proptest! {
    #[test]
    fn accepted_frequencies_round_trip(
        freq in FREQ_ACCEPT_MIN_HZ..=FREQ_ACCEPT_MAX_HZ,
    ) {
        let mut store = NvsAdapter::default();
        store.save(freq).unwrap();
        prop_assert_eq!(store.load(), freq);
    }

    #[test]
    fn out_of_band_frequencies_load_as_default(freq in any::<u16>()) {
        prop_assume!(!(FREQ_ACCEPT_MIN_HZ..=FREQ_ACCEPT_MAX_HZ).contains(&freq));
        let mut store = NvsAdapter::default();
        store.save(freq).unwrap();
        prop_assert_eq!(store.load(), DEFAULT_FREQ_HZ);
    }
}

// ── Polling contract ──────────────────────────────────────────

#[derive(Default)]
struct TraceHw {
    trace: Vec<bool>,
    cursor: usize,
    transitions: u32,
}

impl SignalPort for TraceHw {
    fn signal_requested(&mut self) -> bool {
        let level = self.trace[self.cursor];
        self.cursor += 1;
        level
    }
}

impl TonePort for TraceHw {
    fn start(&mut self, _freq_hz: u16) {
        self.transitions += 1;
    }
    fn stop(&mut self) {
        self.transitions += 1;
    }
}

struct NullSink;
impl EventSink for NullSink {
    fn emit(&mut self, _event: &BuzzerEvent) {}
}

/// Level changes in a trace that starts from the idle (inactive) state.
fn edge_count(trace: &[bool]) -> u32 {
    let mut edges = 0;
    let mut level = false;
    for &sample in trace {
        if sample != level {
            edges += 1;
            level = sample;
        }
    }
    edges
}

proptest! {
    #[test]
    fn tone_transitions_match_signal_edges_exactly(
        trace in proptest::collection::vec(any::<bool>(), 0..64),
    ) {
        let mut ctrl = BuzzerController::new(DEFAULT_FREQ_HZ);
        let mut hw = TraceHw { trace: trace.clone(), ..Default::default() };
        let mut sink = NullSink;

        for _ in 0..trace.len() {
            ctrl.poll(&mut hw, &mut sink);
        }

        // Redundant polls at a steady level must not restart or re-stop the
        // tone; only level changes act.
        prop_assert_eq!(hw.transitions, edge_count(&trace));
    }

    #[test]
    fn sound_state_mirrors_the_last_sampled_level(
        trace in proptest::collection::vec(any::<bool>(), 1..64),
    ) {
        let mut ctrl = BuzzerController::new(DEFAULT_FREQ_HZ);
        let mut hw = TraceHw { trace: trace.clone(), ..Default::default() };
        let mut sink = NullSink;

        for _ in 0..trace.len() {
            ctrl.poll(&mut hw, &mut sink);
        }

        prop_assert_eq!(ctrl.sound_on(), *trace.last().unwrap());
    }
}
