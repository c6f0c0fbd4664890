//! Hardware drivers: tone timer, one-shot GPIO init, watchdog.

pub mod hw_init;
pub mod tone;
pub mod watchdog;
