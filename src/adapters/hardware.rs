//! Hardware adapter: binds the tone engine and the FC signal pin to the
//! [`TonePort`] and [`SignalPort`] traits the domain core consumes.

use crate::app::ports::{SignalPort, TonePort};
use crate::drivers::hw_init;
use crate::drivers::tone::ToneEngine;
use crate::pins;

pub struct HardwareAdapter {
    tone: ToneEngine,
}

impl HardwareAdapter {
    pub fn new(tone: ToneEngine) -> Self {
        Self { tone }
    }

    /// Direct access for the simulation backend (tests inspect pin state).
    #[cfg(not(target_os = "espidf"))]
    pub fn tone_engine(&self) -> &ToneEngine {
        &self.tone
    }
}

impl TonePort for HardwareAdapter {
    fn start(&mut self, freq_hz: u16) {
        self.tone.start(freq_hz);
    }

    fn stop(&mut self) {
        self.tone.stop();
    }
}

impl SignalPort for HardwareAdapter {
    fn signal_requested(&mut self) -> bool {
        // Active-low: the FC pulls the line to ground when it wants sound.
        // The pull-up ensures an unconnected line reads "not requested".
        !hw_init::gpio_read(pins::SIGNAL_GPIO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::{SignalPort, TonePort};

    #[test]
    fn unconnected_line_reads_not_requested() {
        // The sim GPIO backend reads the pulled-up idle level.
        let mut hw = HardwareAdapter::new(ToneEngine::new());
        assert!(!hw.signal_requested());
    }

    #[test]
    fn tone_port_delegates_to_engine() {
        let mut hw = HardwareAdapter::new(ToneEngine::new());
        hw.start(2500);
        assert!(hw.tone_engine().is_running());
        hw.stop();
        assert!(!hw.tone_engine().is_running());
        assert!(!hw.tone_engine().output_high());
    }
}
