//! Peripheral drivers and one-shot hardware initialisation.
//!
//! Every driver compiles on the host too, with an in-memory simulation in
//! place of the ESP-IDF calls.

pub mod adc;
pub mod hw_init;
pub mod hw_timer;
pub mod watchdog;
