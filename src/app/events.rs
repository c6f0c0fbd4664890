//! Outbound application events.
//!
//! The controllers emit these through the
//! [`EventSink`](super::ports::EventSink) port. The production adapter
//! writes them to the serial log; integration tests capture them to assert
//! on ordering (persistence-before-playback, edge-only tone transitions).

use super::controller::OperatingMode;

/// Structured events emitted by the domain core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuzzerEvent {
    /// Boot-time mode decision, made exactly once per power cycle.
    ModeSelected(OperatingMode),

    /// The tone engine was started at the given frequency (Hz).
    ToneStarted(u16),

    /// The tone engine was stopped.
    ToneStopped,

    /// A calibration candidate was committed to persistent storage.
    /// Always precedes the candidate's `ToneStarted`.
    CandidateSaved(u16),
}
