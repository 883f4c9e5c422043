//! GPIO / peripheral pin assignments for the thermostat board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Pump relay
// ---------------------------------------------------------------------------

/// Digital output driving the pump relay coil.
pub const PUMP_RELAY_GPIO: i32 = 2;
/// Relay board input is inverted (LOW = coil energised).
pub const PUMP_RELAY_ACTIVE_LOW: bool = true;

// ---------------------------------------------------------------------------
// Sensors: analog (ADC1)
// ---------------------------------------------------------------------------

/// NTC thermistor on the low side of a 20 kΩ pull-up divider.
/// ADC1 channel 8 (GPIO 9 on ESP32-S3).
pub const THERMISTOR_ADC_GPIO: i32 = 9;
