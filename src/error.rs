//! Unified error types for the paddle shifter firmware.
//!
//! Two families exist: configuration errors, caught once by
//! [`ShifterConfig::validate`](crate::config::ShifterConfig::validate)
//! before anything runs, and hardware faults, which are fatal and end in a
//! watchdog reset (see [`crate::safety`]).  All variants are `Copy` so they
//! can be handed across interrupt contexts without allocation.

use core::fmt;

use crate::app::commands::Channel;
use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Build configuration rejected at start-up.
    Config(ConfigError),
    /// ADC driver broke its contract.
    Hardware(HardwareFault),
    /// Peripheral initialisation failed.
    Init(HwInitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Hardware(e) => write!(f, "hardware: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A band's lower bound is above its upper bound.
    InvertedBand(Channel),
    /// Two bands share at least one ADC code.
    OverlappingBands(Channel, Channel),
    /// A band reaches above the maximum valid ADC value.
    BandOutOfRange(Channel),
    /// `tick_period_ms` is zero.
    ZeroTickPeriod,
    /// `sample_period_us` is zero.
    ZeroSamplePeriod,
    /// A hold-time sample threshold is zero.
    ZeroHoldSamples,
    /// `observations_per_sample` is zero.
    ZeroObservations,
    /// Buffer capacity is zero or above [`MAX_BURST`](crate::signal::burst::MAX_BURST).
    BufferCapacity(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvertedBand(ch) => write!(f, "{ch:?} band lower bound above upper bound"),
            Self::OverlappingBands(a, b) => write!(f, "{a:?} and {b:?} bands overlap"),
            Self::BandOutOfRange(ch) => write!(f, "{ch:?} band exceeds maximum ADC value"),
            Self::ZeroTickPeriod => write!(f, "tick period must be non-zero"),
            Self::ZeroSamplePeriod => write!(f, "sample period must be non-zero"),
            Self::ZeroHoldSamples => write!(f, "hold-time samples must be non-zero"),
            Self::ZeroObservations => write!(f, "observations per sample must be non-zero"),
            Self::BufferCapacity(n) => write!(f, "ADC buffer capacity {n} unsupported"),
        }
    }
}

impl core::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Hardware faults
// ---------------------------------------------------------------------------

/// Fatal ADC contract violations.  There is no recovery path: the fault
/// monitor latches the code and hands control to the watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HardwareFault {
    /// Peripheral reported more conversions than the buffer holds.
    SampleOverrun = 1,
    /// Averaged burst is above the maximum valid ADC code.
    ValueOutOfRange = 2,
}

impl HardwareFault {
    /// Latch encoding; zero means "no fault".
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::SampleOverrun),
            2 => Some(Self::ValueOutOfRange),
            _ => None,
        }
    }
}

impl fmt::Display for HardwareFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SampleOverrun => write!(f, "ADC sample overrun"),
            Self::ValueOutOfRange => write!(f, "ADC average out of range"),
        }
    }
}

impl core::error::Error for HardwareFault {}

impl From<HardwareFault> for Error {
    fn from(e: HardwareFault) -> Self {
        Self::Hardware(e)
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
