//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter    | Implements       | Connects to               |
//! |------------|------------------|---------------------------|
//! | `hardware` | TonePort         | Tone timer + piezo GPIO   |
//! |            | SignalPort       | FC signal GPIO            |
//! | `nvs`      | FrequencyStore   | NVS / in-memory store     |
//! | `log_sink` | EventSink        | Serial log output         |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
