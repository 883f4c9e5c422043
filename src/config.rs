//! System configuration parameters
//!
//! All tunable parameters for the thermostat. Values are fixed at build
//! time; an optional JSON document can override them at load time (see
//! [`ThermostatConfig::from_json`]). Nothing here changes at runtime.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Highest sample rate the control loop accepts.
pub const MAX_SAMPLE_FREQUENCY_HZ: f64 = 1000.0;

/// Lowest sample rate the control loop accepts: one sample per day.
pub const MIN_SAMPLE_FREQUENCY_HZ: f64 = 1.0 / 86_400.0;

/// Hysteresis thresholds, all in Kelvin.
///
/// Invariant (enforced by [`ThermostatConfig::validate`]):
/// `min_k < target_k < max_k`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetBand {
    pub target_k: f64,
    pub min_k: f64,
    pub max_k: f64,
}

impl TargetBand {
    /// Symmetric band of `±fraction` around `target_k`.
    pub fn around(target_k: f64, fraction: f64) -> Self {
        Self {
            target_k,
            min_k: target_k * (1.0 - fraction),
            max_k: target_k * (1.0 + fraction),
        }
    }

    /// Whether `kelvin` lies inside the dead band (bounds inclusive).
    pub fn contains(&self, kelvin: f64) -> bool {
        (self.min_k..=self.max_k).contains(&kelvin)
    }
}

impl Default for TargetBand {
    fn default() -> Self {
        Self {
            target_k: 294.15,
            min_k: 264.735, // target - 10%
            max_k: 323.565, // target + 10%
        }
    }
}

/// Steinhart-Hart coefficients: `1/T = A + B*ln(R) + C*ln(R)^3`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermistorModel {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl ThermistorModel {
    /// Evaluate `1/T` for `x = ln(R)`.
    pub fn inverse_temperature(&self, x: f64) -> f64 {
        self.a + self.b * x + self.c * x.powi(3)
    }
}

impl Default for ThermistorModel {
    fn default() -> Self {
        Self {
            a: 0.000_623_271_937_5,
            b: 0.000_227_666_042_3,
            c: 0.000_000_071_849_068_63,
        }
    }
}

/// Voltage divider feeding the ADC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividerCircuit {
    /// Pull-up resistor in ohms.
    pub pull_up_ohms: f64,
    /// Reference voltage in volts.
    pub v_ref: f64,
    /// ADC full-scale count (2^bits - 1).
    pub adc_max: u16,
}

impl Default for DividerCircuit {
    fn default() -> Self {
        Self {
            pull_up_ohms: 20_000.0,
            v_ref: 3.3,
            adc_max: 1023, // 10-bit
        }
    }
}

/// What the control loop does with the pump when a reading is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FaultPolicy {
    /// De-energise the pump until a good reading arrives.
    #[default]
    ForceOff,
    /// Keep the last commanded state.
    HoldLast,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermostatConfig {
    /// How often to sample the temperature.
    pub sample_frequency_hz: f64,
    pub band: TargetBand,
    pub thermistor: ThermistorModel,
    pub circuit: DividerCircuit,
    pub fault_policy: FaultPolicy,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            sample_frequency_hz: 1.0,
            band: TargetBand::default(),
            thermistor: ThermistorModel::default(),
            circuit: DividerCircuit::default(),
            fault_policy: FaultPolicy::default(),
        }
    }
}

impl ThermostatConfig {
    /// Parse and validate a JSON override. Missing fields keep their
    /// defaults.
    pub fn from_json(doc: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(doc).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the control loop meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let hz = self.sample_frequency_hz;
        if !(MIN_SAMPLE_FREQUENCY_HZ..=MAX_SAMPLE_FREQUENCY_HZ).contains(&hz) {
            return Err(ConfigError::ValidationFailed(
                "sample_frequency_hz: must be between one per day and 1000",
            ));
        }

        let band = &self.band;
        if !(band.min_k.is_finite() && band.target_k.is_finite() && band.max_k.is_finite()) {
            return Err(ConfigError::ValidationFailed("band: thresholds must be finite"));
        }
        if band.min_k <= 0.0 {
            return Err(ConfigError::ValidationFailed("band: min_k must be above absolute zero"));
        }
        if band.min_k >= band.target_k {
            return Err(ConfigError::ValidationFailed("band: min_k must be below target_k"));
        }
        if band.target_k >= band.max_k {
            return Err(ConfigError::ValidationFailed("band: target_k must be below max_k"));
        }

        let m = &self.thermistor;
        if !(m.a.is_finite() && m.b.is_finite() && m.c.is_finite()) {
            return Err(ConfigError::ValidationFailed("thermistor: coefficients must be finite"));
        }

        let circuit = &self.circuit;
        if !circuit.pull_up_ohms.is_finite() || circuit.pull_up_ohms <= 0.0 {
            return Err(ConfigError::ValidationFailed("circuit: pull_up_ohms must be positive"));
        }
        if !circuit.v_ref.is_finite() || circuit.v_ref <= 0.0 {
            return Err(ConfigError::ValidationFailed("circuit: v_ref must be positive"));
        }
        if circuit.adc_max == 0 {
            return Err(ConfigError::ValidationFailed("circuit: adc_max must be non-zero"));
        }
        Ok(())
    }

    /// Time between samples, `1 / sample_frequency_hz`, at nanosecond
    /// resolution. Fails instead of panicking when the frequency has no
    /// representable interval.
    pub fn sample_interval(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(1.0 / self.sample_frequency_hz).map_err(|_| {
            ConfigError::ValidationFailed("sample_frequency_hz: interval not representable")
        })
    }
}
