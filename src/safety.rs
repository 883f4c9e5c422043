//! Safety supervisor.
//!
//! The supervisor sees **every conversion result before the controller**.
//! An unusable reading latches a sensor fault and the configured
//! [`FaultPolicy`] picks the pump state for that cycle instead of the
//! hysteresis decision.
//!
//! ## Fault lifecycle
//!
//! 1. The converter returns an error (full scale, zero resistance, ...).
//! 2. The supervisor latches it and reports [`FaultTransition::Raised`].
//! 3. While latched, the pump follows the fallback policy.
//! 4. The first good reading clears the latch and reports
//!    [`FaultTransition::Cleared`]; control resumes from whatever state
//!    the fallback left the pump in.

use log::{error, info, warn};

use crate::config::{FaultPolicy, ThermostatConfig};
use crate::control::hysteresis::PumpState;
use crate::error::SensorError;
use crate::sensors::Kelvin;

/// Change in the latched fault caused by one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultTransition {
    /// Nothing changed.
    Unchanged,
    /// A new fault was latched, or the latched fault changed kind.
    Raised(SensorError),
    /// The latched fault cleared on a good reading.
    Cleared,
}

/// Safety supervisor.
pub struct SafetySupervisor {
    policy: FaultPolicy,
    /// Latched sensor fault, if any.
    fault: Option<SensorError>,
    /// Unusable readings in a row.
    consecutive_faults: u32,
}

impl SafetySupervisor {
    pub fn new(config: &ThermostatConfig) -> Self {
        Self {
            policy: config.fault_policy,
            fault: None,
            consecutive_faults: 0,
        }
    }

    /// Evaluate this cycle's reading and update the latch.
    pub fn evaluate(&mut self, reading: &Result<Kelvin, SensorError>) -> FaultTransition {
        match (reading, self.fault) {
            (Ok(_), None) => FaultTransition::Unchanged,
            (Ok(_), Some(prev)) => {
                info!(
                    "SENSOR FAULT CLEARED: {prev} (after {} bad readings)",
                    self.consecutive_faults
                );
                self.fault = None;
                self.consecutive_faults = 0;
                FaultTransition::Cleared
            }
            (Err(e), None) => {
                error!("SENSOR FAULT SET: {e}");
                self.fault = Some(*e);
                self.consecutive_faults = 1;
                FaultTransition::Raised(*e)
            }
            (Err(e), Some(prev)) => {
                self.consecutive_faults = self.consecutive_faults.saturating_add(1);
                if *e == prev {
                    FaultTransition::Unchanged
                } else {
                    warn!("SENSOR FAULT CHANGED: {prev} -> {e}");
                    self.fault = Some(*e);
                    FaultTransition::Raised(*e)
                }
            }
        }
    }

    /// Pump state to command while a fault is latched.
    pub fn fallback(&self, last: PumpState) -> PumpState {
        match self.policy {
            FaultPolicy::ForceOff => PumpState::Off,
            FaultPolicy::HoldLast => last,
        }
    }

    /// True if a sensor fault is latched.
    pub fn has_fault(&self) -> bool {
        self.fault.is_some()
    }

    pub fn active_fault(&self) -> Option<SensorError> {
        self.fault
    }

    pub fn consecutive_faults(&self) -> u32 {
        self.consecutive_faults
    }
}
