//! One-shot hardware peripheral initialisation.
//!
//! Brings up the horn-wire ADC unit and the output GPIOs.  Called once from
//! `main()` before any timer is started.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

use crate::adapters::pin_outputs::PinOutputs;
use crate::config::ShifterConfig;
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    TimerFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::TimerFailed(rc)      => write!(f, "periodic timer setup failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

// ── ADC (oneshot) ─────────────────────────────────────────────

/// Configured ADC1 unit plus the horn-wire channel.
#[cfg(target_os = "espidf")]
pub struct AdcHandle {
    pub(crate) unit: adc_oneshot_unit_handle_t,
    pub(crate) channel: adc_channel_t,
}

#[cfg(not(target_os = "espidf"))]
pub struct AdcHandle {
    pub(crate) channel: u32,
}

#[cfg(target_os = "espidf")]
pub fn init_adc(channel: u32) -> Result<AdcHandle, HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    let mut unit: adc_oneshot_unit_handle_t = core::ptr::null_mut();
    // SAFETY: called once from main() before any timer callback can read.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &mut unit) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    // SAFETY: `unit` was created just above.
    let ret = unsafe { adc_oneshot_config_channel(unit, channel, &chan_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    info!("hw_init: ADC1 CH{} configured (GPIO {})", channel, pins::HORN_WIRE_ADC_GPIO);
    Ok(AdcHandle { unit, channel })
}

#[cfg(not(target_os = "espidf"))]
pub fn init_adc(channel: u32) -> Result<AdcHandle, HwInitError> {
    info!("hw_init(sim): ADC1 CH{} (GPIO {}) simulated", channel, pins::HORN_WIRE_ADC_GPIO);
    Ok(AdcHandle { channel })
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub type OutputLine = esp_idf_hal::gpio::PinDriver<
    'static,
    esp_idf_hal::gpio::AnyOutputPin,
    esp_idf_hal::gpio::Output,
>;

#[cfg(not(target_os = "espidf"))]
pub type OutputLine = SimPin;

#[cfg(target_os = "espidf")]
fn output_line(gpio: i32) -> Result<OutputLine, HwInitError> {
    // SAFETY: every GPIO in `pins` is claimed exactly once, from here.
    let pin = unsafe { esp_idf_hal::gpio::AnyOutputPin::new(gpio) };
    esp_idf_hal::gpio::PinDriver::output(pin).map_err(|e| HwInitError::GpioConfigFailed(e.code()))
}

#[cfg(not(target_os = "espidf"))]
fn output_line(gpio: i32) -> Result<OutputLine, HwInitError> {
    Ok(SimPin { gpio, high: None })
}

/// Claim every output GPIO the configuration asks for.
pub fn board_outputs(config: &ShifterConfig) -> Result<PinOutputs<OutputLine>, HwInitError> {
    let mut outputs = PinOutputs::new(
        output_line(pins::HORN_OUT_GPIO)?,
        output_line(pins::SHIFT_UP_GPIO)?,
        output_line(pins::SHIFT_DOWN_GPIO)?,
        config.polarity,
    );
    if config.debug_indicator {
        outputs = outputs.with_debug(
            output_line(pins::DEBUG_A_GPIO)?,
            output_line(pins::DEBUG_B_GPIO)?,
        );
    }
    if config.bypass_relay {
        outputs = outputs.with_bypass(output_line(pins::BYPASS_RELAY_GPIO)?);
    }
    info!(
        "hw_init: outputs claimed (debug={}, bypass={})",
        config.debug_indicator, config.bypass_relay
    );
    Ok(outputs)
}

/// Host stand-in for an output GPIO.  Remembers the last level written.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug)]
pub struct SimPin {
    pub gpio: i32,
    pub high: Option<bool>,
}

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::ErrorType for SimPin {
    type Error = core::convert::Infallible;
}

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = Some(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = Some(true);
        Ok(())
    }
}
