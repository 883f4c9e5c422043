//! Heating pump relay driver.
//!
//! The pump is switched through a relay (or MOSFET) on one GPIO. Any
//! `embedded_hal` [`OutputPin`] works; polarity is configurable because
//! common relay boards are active-low.
//!
//! ## Safety contract
//!
//! The driver is a dumb actuator: it does not decide when to run. The
//! recorded state only changes after the pin write succeeds, so a failed
//! write never reports the pump as switched.

use embedded_hal::digital::OutputPin;
use log::debug;

use crate::control::hysteresis::PumpState;
use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Pin HIGH energises the pump.
    ActiveHigh,
    /// Pin LOW energises the pump.
    ActiveLow,
}

pub struct PumpRelay<P> {
    pin: P,
    polarity: Polarity,
    state: PumpState,
    switch_count: u32,
}

impl<P: OutputPin> PumpRelay<P> {
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self {
            pin,
            polarity,
            state: PumpState::Off,
            switch_count: 0,
        }
    }

    /// Drive the pin for `state`. Rewrites the pin even when `state` is
    /// unchanged.
    pub fn set(&mut self, state: PumpState) -> Result<(), ActuatorError> {
        let high = match self.polarity {
            Polarity::ActiveHigh => state.is_on(),
            Polarity::ActiveLow => !state.is_on(),
        };
        let written = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        written.map_err(|_| ActuatorError::GpioWriteFailed)?;

        if state != self.state {
            self.switch_count = self.switch_count.saturating_add(1);
            debug!("pump relay -> {} (switch #{})", state, self.switch_count);
        }
        self.state = state;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        self.set(PumpState::Off)
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_on()
    }

    /// Number of on/off transitions since construction.
    pub fn switch_count(&self) -> u32 {
        self.switch_count
    }

    /// Give back the pin, e.g. to reconfigure it.
    pub fn release(self) -> P {
        self.pin
    }
}
