//! GPIO pin assignments for the buzzer adapter board.
//!
//! Single source of truth — drivers reference this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Piezo output
// ---------------------------------------------------------------------------

/// Digital output to the NPN transistor driving the piezo element.
/// Square wave at the current frequency when sounding, held low when silent.
pub const BUZZER_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// Flight-controller signal input
// ---------------------------------------------------------------------------

/// Input from the flight controller's BUZ- pad. Active-low with internal
/// pull-up: LOW = sound requested, HIGH (or unconnected) = silence.
///
/// Dual purpose: shorted to ground at power-on, the same pin selects
/// calibration mode. The dual use works because mode is decided exactly
/// once, before normal-mode polling begins.
pub const SIGNAL_GPIO: i32 = 4;
