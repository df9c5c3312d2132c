//! PaddleShift firmware library.
//!
//! Horn-wire paddle shifter: one analog wire carries the horn button and
//! both shift paddles through a resistor ladder.  The library classifies
//! ADC bursts, debounces them into commands and times the output pulses.
//!
//! All ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each driver; everything else builds and tests on the host.

#![cfg_attr(not(any(test, target_os = "espidf")), no_std)]
#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod debounce;
pub mod error;
pub mod relay;
pub mod safety;
pub mod shared;
pub mod signal;
pub mod timebase;

pub mod adapters;
pub mod drivers;
pub mod pins;

pub use error::{Error, Result};
