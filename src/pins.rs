//! GPIO / peripheral pin assignments for the shifter board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Horn wire sense (ADC1)
// ---------------------------------------------------------------------------

/// Resistor-ladder voltage on the steering-wheel horn wire.
/// ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const HORN_WIRE_ADC_GPIO: i32 = 1;
pub const HORN_WIRE_ADC_CHANNEL: u32 = 0;

// ---------------------------------------------------------------------------
// Vehicle outputs
// ---------------------------------------------------------------------------

/// Horn relay driver.
pub const HORN_OUT_GPIO: i32 = 4;
/// Gearbox shift-up request line.
pub const SHIFT_UP_GPIO: i32 = 5;
/// Gearbox shift-down request line.
pub const SHIFT_DOWN_GPIO: i32 = 6;
/// Relay that routes the horn wire straight to the horn when de-energised.
pub const BYPASS_RELAY_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Debug indicator LEDs
// ---------------------------------------------------------------------------

pub const DEBUG_A_GPIO: i32 = 11;
pub const DEBUG_B_GPIO: i32 = 12;
