//! Build configuration parameters
//!
//! Every tunable the shifter logic depends on.  Hardware revisions differ
//! only in these values (ADC bands, durations, output polarity); the logic
//! itself is shared.  `Default` is the reference horn-wire build.

use serde::{Deserialize, Serialize};

use crate::app::commands::Channel;
use crate::error::ConfigError;
use crate::signal::burst::MAX_BURST;

/// Closed range of raw ADC codes, `lower..=upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdcBand {
    pub lower: u16,
    pub upper: u16,
}

impl AdcBand {
    pub const fn new(lower: u16, upper: u16) -> Self {
        Self { lower, upper }
    }

    pub const fn contains(&self, raw: u16) -> bool {
        raw >= self.lower && raw <= self.upper
    }

    const fn overlaps(&self, other: &AdcBand) -> bool {
        self.lower <= other.upper && other.lower <= self.upper
    }
}

/// Voltage buckets, one per non-idle class.  A missing band means the class
/// can never be produced on this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdTable {
    pub horn: Option<AdcBand>,
    pub shift_up: Option<AdcBand>,
    pub shift_down: Option<AdcBand>,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        // 12-bit ADC, ~0.806 mV/LSB.  Above ~2.5 V the wire is idle.
        Self {
            horn: Some(AdcBand::new(0x0000, 0x0150)),       // ~0 – 0.27 V
            shift_down: Some(AdcBand::new(0x0200, 0x064E)), // ~0.41 – 1.3 V
            shift_up: Some(AdcBand::new(0x0746, 0x0C1F)),   // ~1.5 – 2.5 V
        }
    }
}

impl ThresholdTable {
    pub fn band(&self, channel: Channel) -> Option<AdcBand> {
        match channel {
            Channel::ShiftUp => self.shift_up,
            Channel::ShiftDown => self.shift_down,
            Channel::Horn => self.horn,
        }
    }

    /// Reject inverted, overlapping or out-of-range bands.
    pub fn validate(&self, adc_max_value: u16) -> Result<(), ConfigError> {
        for ch in Channel::ALL {
            if let Some(band) = self.band(ch) {
                if band.lower > band.upper {
                    return Err(ConfigError::InvertedBand(ch));
                }
                if band.upper > adc_max_value {
                    return Err(ConfigError::BandOutOfRange(ch));
                }
            }
        }

        for (i, a) in Channel::ALL.iter().enumerate() {
            for b in &Channel::ALL[i + 1..] {
                if let (Some(x), Some(y)) = (self.band(*a), self.band(*b)) {
                    if x.overlaps(&y) {
                        return Err(ConfigError::OverlappingBands(*a, *b));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Electrical sense of an output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    /// Physical pin level (`true` = high) for a logical state.
    pub const fn pin_level(self, active: bool) -> bool {
        match self {
            Self::ActiveHigh => active,
            Self::ActiveLow => !active,
        }
    }
}

/// Per-signal output polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPolarity {
    pub horn: Polarity,
    pub shift_up: Polarity,
    pub shift_down: Polarity,
    pub debug: Polarity,
    /// Relay bypasses the controller while its coil is de-energised.
    pub bypass_relay: Polarity,
}

impl Default for OutputPolarity {
    fn default() -> Self {
        Self {
            horn: Polarity::ActiveHigh,
            shift_up: Polarity::ActiveHigh,
            shift_down: Polarity::ActiveHigh,
            debug: Polarity::ActiveHigh,
            bypass_relay: Polarity::ActiveLow,
        }
    }
}

/// How the next ADC burst gets started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionTrigger {
    /// A conversion-rate timer starts a burst once the previous one was processed.
    SampleTimer,
    /// The sampling handler restarts the converter as soon as it finishes.
    SelfRearming,
}

/// Whether both paddles share one debounce lockout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddleLockout {
    /// An accepted shift in either direction locks out both paddles.
    Shared,
    /// Each paddle has its own lockout window.
    PerChannel,
}

/// Core build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShifterConfig {
    // --- ADC ---
    pub thresholds: ThresholdTable,
    /// Largest valid averaged ADC code.
    pub adc_max_value: u16,
    /// Raw conversions per burst the driver may return.
    pub adc_buffer_capacity: usize,

    // --- Debounce / hold ---
    pub paddle_debounce_ms: u32,
    pub horn_debounce_ms: u32,
    /// How long a shift output stays asserted after acceptance.
    pub active_time_ms: u32,
    /// Consecutive in-band averaged samples required to accept a shift.
    pub paddle_hold_samples: u8,
    pub horn_hold_samples: u8,
    /// Times each averaged sample is run through the tracker.
    pub observations_per_sample: u8,
    pub paddle_lockout: PaddleLockout,

    // --- Timing ---
    /// All ADC input is ignored until this much time has passed after boot.
    pub startup_time_ms: u32,
    /// Timebase tick period.
    pub tick_period_ms: u32,
    /// Conversion-rate timer period.
    pub sample_period_us: u32,
    pub conversion_trigger: ConversionTrigger,

    // --- Outputs ---
    pub polarity: OutputPolarity,
    /// Mirror the outputs on the two debug LEDs.
    pub debug_indicator: bool,
    /// Board has a bypass relay around the controller.
    pub bypass_relay: bool,

    // --- Safety ---
    /// Watchdog countdown used by the fault path.
    pub watchdog_timeout_ms: u32,
}

impl Default for ShifterConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdTable::default(),
            adc_max_value: 0x0FFF,
            adc_buffer_capacity: 32,

            paddle_debounce_ms: 50,
            horn_debounce_ms: 50,
            active_time_ms: 30,
            paddle_hold_samples: 3,
            horn_hold_samples: 3,
            observations_per_sample: 1,
            paddle_lockout: PaddleLockout::Shared,

            startup_time_ms: 3000,
            tick_period_ms: 2,
            sample_period_us: 730,
            conversion_trigger: ConversionTrigger::SampleTimer,

            polarity: OutputPolarity::default(),
            debug_indicator: true,
            bypass_relay: false,

            watchdog_timeout_ms: 100,
        }
    }
}

impl ShifterConfig {
    /// Check the whole configuration and derive tick budgets.
    pub fn validate(&self) -> Result<Timing, ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.sample_period_us == 0 {
            return Err(ConfigError::ZeroSamplePeriod);
        }
        if self.paddle_hold_samples == 0 || self.horn_hold_samples == 0 {
            return Err(ConfigError::ZeroHoldSamples);
        }
        if self.observations_per_sample == 0 {
            return Err(ConfigError::ZeroObservations);
        }
        if self.adc_buffer_capacity == 0 || self.adc_buffer_capacity > MAX_BURST {
            return Err(ConfigError::BufferCapacity(self.adc_buffer_capacity));
        }
        self.thresholds.validate(self.adc_max_value)?;
        Ok(Timing::from_config(self))
    }

    /// Consecutive-sample threshold for a channel.
    pub fn hold_samples(&self, channel: Channel) -> u32 {
        match channel {
            Channel::ShiftUp | Channel::ShiftDown => u32::from(self.paddle_hold_samples),
            Channel::Horn => u32::from(self.horn_hold_samples),
        }
    }
}

/// Durations converted to timebase ticks (floor division).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub startup_ticks: u32,
    pub paddle_debounce_ticks: u32,
    pub horn_debounce_ticks: u32,
    pub active_ticks: u32,
}

impl Timing {
    pub fn from_config(config: &ShifterConfig) -> Self {
        let period = config.tick_period_ms.max(1);
        Self {
            startup_ticks: config.startup_time_ms / period,
            paddle_debounce_ticks: config.paddle_debounce_ms / period,
            horn_debounce_ticks: config.horn_debounce_ms / period,
            active_ticks: config.active_time_ms / period,
        }
    }

    pub fn debounce_ticks(&self, channel: Channel) -> u32 {
        if channel.is_paddle() {
            self.paddle_debounce_ticks
        } else {
            self.horn_debounce_ticks
        }
    }
}
