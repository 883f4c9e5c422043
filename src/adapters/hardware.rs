//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the thermistor input and the pump relay, exposing them through
//! [`SensorPort`] and [`ActuatorPort`]. This is the only module in the
//! system that touches actual hardware. On non-espidf targets, the
//! underlying drivers use cfg-gated simulation stubs.

use embedded_hal::digital::OutputPin;
use log::error;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::control::hysteresis::PumpState;
use crate::drivers::pump::PumpRelay;
use crate::error::{ActuatorError, SensorError};
use crate::sensors::RawSample;
use crate::sensors::thermistor::ThermistorInput;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P> {
    thermistor: ThermistorInput,
    pump: PumpRelay<P>,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(thermistor: ThermistorInput, pump: PumpRelay<P>) -> Self {
        Self { thermistor, pump }
    }

    pub fn pump(&self) -> &PumpRelay<P> {
        &self.pump
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P: OutputPin> SensorPort for HardwareAdapter<P> {
    fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        self.thermistor.read()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P: OutputPin> ActuatorPort for HardwareAdapter<P> {
    fn command_pump(&mut self, state: PumpState) -> Result<(), ActuatorError> {
        self.pump.set(state)
    }

    fn pump_state(&self) -> PumpState {
        self.pump.state()
    }

    fn all_off(&mut self) {
        if let Err(e) = self.pump.stop() {
            error!("all_off: pump stop failed: {}", e);
        }
    }
}
