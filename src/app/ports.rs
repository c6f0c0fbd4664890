//! Port traits — the boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ controller / calibration (domain)
//! ```
//!
//! Driven adapters (tone engine, signal pin, persistent store, event sinks)
//! implement these traits. The controllers consume them via generics, so
//! the domain core never touches hardware directly.

use super::events::BuzzerEvent;

// ───────────────────────────────────────────────────────────────
// Tone port (domain → piezo)
// ───────────────────────────────────────────────────────────────

/// Square-wave tone generation on the piezo output pin.
pub trait TonePort {
    /// Begin (or retune) the tone at `freq_hz`.
    ///
    /// `freq_hz == 0` is a no-op — it guards a division by zero in the
    /// timer threshold computation. Calling `start` while already running
    /// reprograms the frequency; no toggle-phase guarantee is made across
    /// the change.
    fn start(&mut self, freq_hz: u16);

    /// Silence the output. Always leaves the pin driven low regardless of
    /// toggle phase; idempotent.
    fn stop(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Signal port (flight controller → domain)
// ───────────────────────────────────────────────────────────────

/// Samples the buzzer-enable line from the flight controller.
pub trait SignalPort {
    /// `true` when the line reads at its active (low) level. Pure
    /// sampling — no debounce, no edge memory; latency is one register
    /// read.
    fn signal_requested(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Frequency store (domain ↔ non-volatile storage)
// ───────────────────────────────────────────────────────────────

/// Persistent storage for the calibrated frequency.
pub trait FrequencyStore {
    /// Last-good frequency, or the compiled-in default when the record is
    /// absent, unmarked, or out of the acceptance range. Never fails
    /// outward — invalid persisted state is recovered silently.
    fn load(&self) -> u16;

    /// Persist `freq_hz`. The frequency field is committed before the
    /// validity marker: a power loss between the two leaves a
    /// detectably-invalid record, so the next boot falls back to the
    /// default instead of a silently wrong frequency.
    fn save(&mut self, freq_hz: u16) -> Result<(), StoreError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The controllers emit structured [`BuzzerEvent`]s through this port.
/// Adapters decide where they go (serial log in production, a capture
/// buffer in tests).
pub trait EventSink {
    fn emit(&mut self, event: &BuzzerEvent);
}

// ───────────────────────────────────────────────────────────────
// Heartbeat (domain → liveness watchdog)
// ───────────────────────────────────────────────────────────────

/// Liveness callback invoked between chunks of every blocking delay and on
/// every polling iteration. The production implementation feeds the
/// hardware watchdog; tests count pulses.
pub trait Heartbeat {
    fn pulse(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`FrequencyStore`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Storage backend could not be initialised.
    InitFailed,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InitFailed => write!(f, "store init failed"),
            Self::IoError => write!(f, "store I/O error"),
        }
    }
}
