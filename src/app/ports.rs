//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Thermostat (domain)
//! ```
//!
//! Driven adapters (thermistor ADC, pump relay, event sinks) implement
//! these traits. The [`Thermostat`](super::service::Thermostat) consumes
//! them via generics, so the domain core never touches hardware directly.
//!
//! Timing is not a port of its own: the loop takes any
//! [`embedded_hal::delay::DelayNs`], which the ESP-IDF HAL already
//! provides and tests replace with a recording no-op.

use crate::control::hysteresis::PumpState;
use crate::error::{ActuatorError, SensorError};
use crate::sensors::RawSample;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per cycle.
pub trait SensorPort {
    /// Acquire the current thermistor sample, in the configured full scale.
    fn read_raw(&mut self) -> Result<RawSample, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the pump.
pub trait ActuatorPort {
    /// Energise or de-energise the pump. Called every cycle, including
    /// when the state is unchanged, so implementations must be idempotent.
    fn command_pump(&mut self, state: PumpState) -> Result<(), ActuatorError>;

    /// Last state successfully commanded.
    fn pump_state(&self) -> PumpState;

    /// Kill all actuators for a safe shutdown. Best effort; failures are
    /// logged and `pump_state()` keeps reporting what the relay last accepted.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
