//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured domain events to the
//! logger (UART / USB-CDC in production). Tests use a capture sink
//! instead; this device has no other telemetry channel.

use log::info;

use crate::app::events::BuzzerEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`BuzzerEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &BuzzerEvent) {
        match event {
            BuzzerEvent::ModeSelected(mode) => {
                info!("MODE | {:?}", mode);
            }
            BuzzerEvent::ToneStarted(freq_hz) => {
                info!("TONE | on @ {} Hz", freq_hz);
            }
            BuzzerEvent::ToneStopped => {
                info!("TONE | off");
            }
            BuzzerEvent::CandidateSaved(freq_hz) => {
                info!("CAL  | {} Hz persisted (power off now to keep it)", freq_hz);
            }
        }
    }
}
