//! NTC thermistor input and Steinhart-Hart conversion.
//!
//! The thermistor sits on the low side of a voltage divider with a fixed
//! pull-up resistor, read through the ADC:
//!
//! ```text
//!   V_ref ── R_pullup ──┬── ADC
//!                       └── R_ntc ── GND
//! ```
//!
//! `R_ntc = R_pullup * v / (V_ref - v)` and
//! `1 / T = A + B * ln(R) + C * ln(R)^3`.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the thermistor ADC1 channel via the oneshot API
//! (initialised by hw_init) and rescales it to the configured full scale.
//! On host/test: reads from a static AtomicU16 for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use crate::config::{DividerCircuit, ThermistorModel, ThermostatConfig};
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

use super::{Kelvin, RawSample};

/// Simulated ADC level, already in the configured full scale.
/// 876 is roughly 294 K with the default divider.
#[cfg(not(target_os = "espidf"))]
static SIM_THERMISTOR_ADC: AtomicU16 = AtomicU16::new(876);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(raw: u16) {
    SIM_THERMISTOR_ADC.store(raw, Ordering::Relaxed);
}

// ───────────────────────────────────────────────────────────────
// Converter (pure)
// ───────────────────────────────────────────────────────────────

/// Converts raw divider samples into absolute temperature.
#[derive(Debug, Clone, Copy)]
pub struct ThermistorConverter {
    model: ThermistorModel,
    circuit: DividerCircuit,
}

impl ThermistorConverter {
    pub fn new(model: ThermistorModel, circuit: DividerCircuit) -> Self {
        Self { model, circuit }
    }

    pub fn from_config(config: &ThermostatConfig) -> Self {
        Self::new(config.thermistor, config.circuit)
    }

    /// Convert one sample to Kelvin.
    ///
    /// A full-scale sample is rejected before the divider equation divides
    /// by zero, and a zero resistance is rejected before the logarithm.
    pub fn convert(&self, raw: RawSample) -> Result<Kelvin, SensorError> {
        let adc_max = self.circuit.adc_max;
        if raw.0 >= adc_max {
            return Err(SensorError::OutOfRange(raw.0));
        }

        let v_ref = self.circuit.v_ref;
        let voltage = (f64::from(raw.0) / f64::from(adc_max)) * v_ref;
        let resistance = self.circuit.pull_up_ohms * voltage / (v_ref - voltage);
        if resistance.is_nan() || resistance <= 0.0 {
            return Err(SensorError::NonPositiveResistance);
        }

        let inv_t = self.model.inverse_temperature(resistance.ln());
        if !inv_t.is_finite() || inv_t <= 0.0 {
            return Err(SensorError::NonFinite);
        }

        let kelvin = 1.0 / inv_t;
        if !kelvin.is_finite() {
            return Err(SensorError::NonFinite);
        }
        Ok(Kelvin(kelvin))
    }

    /// Find the sample whose converted temperature is nearest `target`.
    ///
    /// Returns `None` when `target` lies outside what the divider can
    /// represent. Temperature falls strictly as the sample rises, so a
    /// bisection over `1..adc_max` suffices.
    pub fn sample_for(&self, target: Kelvin) -> Option<RawSample> {
        let first = 1u16;
        let last = self.circuit.adc_max.checked_sub(1)?;
        if last < first {
            return None;
        }

        let hottest = self.convert(RawSample(first)).ok()?;
        let coldest = self.convert(RawSample(last)).ok()?;
        if !(coldest.0..=hottest.0).contains(&target.0) {
            return None;
        }

        // First sample at or below the target.
        let (mut lo, mut hi) = (first, last);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.convert(RawSample(mid)).ok()?.0 <= target.0 {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }

        if lo > first {
            let above = self.convert(RawSample(lo - 1)).ok()?;
            let below = self.convert(RawSample(lo)).ok()?;
            if above.0 - target.0 < target.0 - below.0 {
                return Some(RawSample(lo - 1));
            }
        }
        Some(RawSample(lo))
    }

    pub fn circuit(&self) -> &DividerCircuit {
        &self.circuit
    }
}

// ───────────────────────────────────────────────────────────────
// ADC input
// ───────────────────────────────────────────────────────────────

/// Full-scale count of the ESP32-S3 12-bit ADC.
#[cfg(target_os = "espidf")]
const ADC_NATIVE_MAX: u32 = 4095;

/// The thermistor's ADC channel, producing samples in the configured
/// full scale.
pub struct ThermistorInput {
    full_scale: u16,
    _adc_gpio: i32,
}

impl ThermistorInput {
    pub fn new(adc_gpio: i32, full_scale: u16) -> Self {
        Self {
            full_scale,
            _adc_gpio: adc_gpio,
        }
    }

    #[cfg(target_os = "espidf")]
    pub fn read(&self) -> Result<RawSample, SensorError> {
        let native = hw_init::adc1_read(hw_init::ADC1_CH_THERMISTOR)
            .ok_or(SensorError::AdcReadFailed)?;
        let scaled = u32::from(native) * u32::from(self.full_scale) / ADC_NATIVE_MAX;
        Ok(RawSample(scaled as u16))
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read(&self) -> Result<RawSample, SensorError> {
        let raw = SIM_THERMISTOR_ADC.load(Ordering::Relaxed);
        Ok(RawSample(raw.min(self.full_scale)))
    }
}
