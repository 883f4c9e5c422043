//! Outbound application events.
//!
//! The [`Thermostat`](super::service::Thermostat) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them.

use crate::control::hysteresis::PumpState;
use crate::error::SensorError;
use crate::sensors::{Kelvin, RawSample};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The control loop has started (carries the initial pump state).
    Started(PumpState),

    /// The commanded pump state changed. `temperature` is `None` when the
    /// change came from the fault fallback.
    PumpChanged {
        from: PumpState,
        to: PumpState,
        temperature: Option<Kelvin>,
    },

    /// A sensor fault was latched (or changed kind).
    SensorFault(SensorError),

    /// The latched sensor fault cleared.
    FaultCleared,

    /// Summary of one completed control cycle.
    Cycle(CycleReport),

    /// The loop shut the pump down.
    Stopped,
}

/// What one control cycle observed and decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    pub raw: Option<RawSample>,
    pub temperature: Option<Kelvin>,
    pub pump: PumpState,
    pub faulted: bool,
}
