//! Blocking delays with a liveness heartbeat.
//!
//! Delays on this device are busy waits of known fixed duration (beep and
//! pause timing). They are chunked into [`HEARTBEAT_CHUNK_MS`] increments
//! with a [`Heartbeat::pulse`] between chunks, so even a 1500 ms
//! calibration tone never risks a spurious watchdog reset.

use embedded_hal::delay::DelayNs;

use crate::config::HEARTBEAT_CHUNK_MS;

use super::ports::{Heartbeat, TonePort};

/// Sleep for `duration_ms`, pulsing the heartbeat every chunk.
pub fn rest<D: DelayNs>(delay: &mut D, duration_ms: u32, heartbeat: &mut impl Heartbeat) {
    let mut remaining = duration_ms;
    while remaining >= HEARTBEAT_CHUNK_MS {
        delay.delay_ms(HEARTBEAT_CHUNK_MS);
        heartbeat.pulse();
        remaining -= HEARTBEAT_CHUNK_MS;
    }
    if remaining > 0 {
        delay.delay_ms(remaining);
        heartbeat.pulse();
    }
}

/// Sound `freq_hz` for `duration_ms`, then silence.
///
/// The tone always plays to its full duration — there is no cancellation
/// concept anywhere in this firmware.
pub fn beep<D: DelayNs>(
    tone: &mut impl TonePort,
    freq_hz: u16,
    duration_ms: u32,
    delay: &mut D,
    heartbeat: &mut impl Heartbeat,
) {
    tone.start(freq_hz);
    rest(delay, duration_ms, heartbeat);
    tone.stop();
}

/// Host-side delay backend for simulation runs.
#[cfg(not(target_os = "espidf"))]
pub struct SimDelay;

#[cfg(not(target_os = "espidf"))]
impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}
