//! Hysteresis (bang-bang) controller for the heating pump.
//!
//! Turns the pump on below the band's minimum and off above its maximum.
//! Inside the dead band the previous state is held, so the pump does not
//! chatter while the temperature hovers around the target.

use core::fmt;

use crate::config::TargetBand;
use crate::sensors::Kelvin;

/// Commanded state of the pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PumpState {
    #[default]
    Off,
    On,
}

impl PumpState {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl From<bool> for PumpState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl fmt::Display for PumpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "OFF"),
            Self::On => write!(f, "ON"),
        }
    }
}

/// Dead-band thermostat decision.
#[derive(Debug, Clone, Copy)]
pub struct HysteresisController {
    band: TargetBand,
}

impl HysteresisController {
    pub fn new(band: TargetBand) -> Self {
        Self { band }
    }

    /// Next pump state for `temperature`, given the `current` state.
    ///
    /// Total over every `f64`: a NaN temperature fails both comparisons
    /// and holds `current`.
    pub fn next_state(&self, temperature: Kelvin, current: PumpState) -> PumpState {
        if temperature.0 < self.band.min_k {
            PumpState::On
        } else if temperature.0 > self.band.max_k {
            PumpState::Off
        } else {
            current
        }
    }

    pub fn band(&self) -> &TargetBand {
        &self.band
    }
}
