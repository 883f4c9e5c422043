//! Sensor subsystem: the thermistor input and its physical-unit types.
//!
//! A cycle reads one [`RawSample`] from the ADC and the
//! [`ThermistorConverter`](thermistor::ThermistorConverter) turns it into a
//! [`Kelvin`] reading. Neither value is retained past the cycle that
//! produced it.

pub mod thermistor;

use core::fmt;

/// Offset between the Kelvin and Celsius scales.
pub const ZERO_CELSIUS_K: f64 = 273.15;

/// Absolute temperature in Kelvin.
///
/// Every threshold and model output in the firmware is Kelvin; Celsius
/// exists only for human-readable log lines.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Kelvin(pub f64);

impl Kelvin {
    pub const fn new(kelvin: f64) -> Self {
        Self(kelvin)
    }

    pub const fn value(self) -> f64 {
        self.0
    }

    pub fn to_celsius(self) -> f64 {
        self.0 - ZERO_CELSIUS_K
    }
}

impl fmt::Display for Kelvin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}K ({:.1}\u{00b0}C)", self.0, self.to_celsius())
    }
}

/// One quantized voltage measurement, `0..=adc_max` of the configured
/// divider circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RawSample(pub u16);

impl From<u16> for RawSample {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}
