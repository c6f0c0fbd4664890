//! FcBuzzer firmware library.
//!
//! Bridges a flight controller's active-low buzzer-enable line to a piezo
//! element, driving it with a square wave at its resonant frequency. A
//! button-free calibration mode sweeps candidate frequencies and persists
//! each one *before* sounding it, so the operator selects the best tone by
//! simply cutting power when they hear it.
//!
//! All ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module; the domain core runs unmodified on the host against
//! in-memory simulation backends.

#![deny(unused_must_use)]

pub mod app;
pub mod config;

pub mod adapters;
pub mod drivers;
pub mod pins;
