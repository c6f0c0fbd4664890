//! Build-time tuning constants for the buzzer firmware.
//!
//! Everything here is fixed at compile time — there is no runtime
//! configuration channel on this device. Frequencies, sweep policy, and
//! beep timing were derived from spectrum analysis of the target piezo
//! element; substitute your own values when fitting a different element.

// ---------------------------------------------------------------------------
// Tone timer
// ---------------------------------------------------------------------------

/// Tone timer input clock (Hz). Two rates are supported; the compare
/// threshold arithmetic assumes one of them.
pub const TIMER_CLOCK_HZ: u32 = 9_600_000;

/// Fixed prescale divisor between the input clock and the compare counter.
pub const TIMER_PRESCALER: u32 = 8;

/// Smallest programmable compare threshold.
pub const THRESHOLD_MIN: u8 = 1;
/// Largest programmable compare threshold (8-bit compare register).
pub const THRESHOLD_MAX: u8 = 255;

// Only the two characterised clock rates are supported.
const _: () = assert!(
    TIMER_CLOCK_HZ == 9_600_000 || TIMER_CLOCK_HZ == 1_200_000,
    "TIMER_CLOCK_HZ must be 9.6 MHz or 1.2 MHz",
);

// ---------------------------------------------------------------------------
// Frequencies
// ---------------------------------------------------------------------------

/// Factory default square-wave frequency (Hz) — resonance mode #2 of the
/// reference piezo. Used whenever the persisted record is absent or invalid.
pub const DEFAULT_FREQ_HZ: u16 = 2500;

/// Lower bound of the acceptance range for persisted frequencies (Hz).
pub const FREQ_ACCEPT_MIN_HZ: u16 = 2400;
/// Upper bound of the acceptance range (Hz). Wider than the sweep range on
/// purpose: records written by earlier firmware with a broader sweep must
/// still load.
pub const FREQ_ACCEPT_MAX_HZ: u16 = 4500;

// ---------------------------------------------------------------------------
// Calibration sweep
// ---------------------------------------------------------------------------

/// First sweep candidate (Hz).
pub const SWEEP_MIN_HZ: u16 = 2400;
/// Last sweep candidate (Hz), inclusive.
pub const SWEEP_MAX_HZ: u16 = 3000;
/// Sweep step (Hz). The reference piezo exhibits discrete resonance modes
/// spaced roughly 90 Hz apart with narrow bandwidth; a 100 Hz step lands
/// near every distinct mode without wasting sweep time on finer steps the
/// element cannot resolve.
pub const SWEEP_STEP_HZ: u16 = 100;

/// Duration each sweep candidate is sounded (ms).
pub const CALIB_TONE_MS: u32 = 1500;
/// Silence between sweep candidates (ms).
pub const CALIB_PAUSE_MS: u32 = 500;
/// Settling pause after the calibration entry signature (ms).
pub const CALIB_ENTRY_SETTLE_MS: u32 = 500;
/// Rest between consecutive full sweeps (ms).
pub const SWEEP_REST_MS: u32 = 1000;

// ---------------------------------------------------------------------------
// Signatures and polling
// ---------------------------------------------------------------------------

/// Short confirmation beep (ms) — normal-mode startup signature.
pub const BEEP_SHORT_MS: u32 = 100;
/// Long confirmation beep (ms) — calibration entry signature.
pub const BEEP_LONG_MS: u32 = 400;
/// Short pause between signature beeps (ms).
pub const PAUSE_SHORT_MS: u32 = 100;
/// Long pause between signature beeps (ms).
pub const PAUSE_LONG_MS: u32 = 300;
/// Settle after the normal-mode startup signature (ms).
pub const POST_SIGNATURE_SETTLE_MS: u32 = 200;

/// Input-level settling delay right after power-up (ms).
pub const STARTUP_SETTLE_MS: u32 = 100;

/// Per-iteration delay in the normal polling loop (µs). Bounds the polling
/// rate (~10 kHz) for power draw; far below any audible tone period.
pub const POLL_DELAY_US: u32 = 100;

// ---------------------------------------------------------------------------
// Liveness
// ---------------------------------------------------------------------------

/// Hardware watchdog timeout (ms). Every loop iteration in both modes must
/// feed faster than this or the device self-resets.
pub const WATCHDOG_TIMEOUT_MS: u32 = 250;

/// Blocking delays are chunked into increments of this size (ms) with a
/// heartbeat between chunks, so a 1500 ms calibration tone never outlasts
/// the watchdog.
pub const HEARTBEAT_CHUNK_MS: u32 = 10;
