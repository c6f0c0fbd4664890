//! Application core — pure domain logic, zero I/O.
//!
//! Mode selection, the normal-mode polling loop, and the calibration sweep
//! all live here. Every interaction with hardware happens through the
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod calibration;
pub mod controller;
pub mod events;
pub mod pacing;
pub mod ports;
