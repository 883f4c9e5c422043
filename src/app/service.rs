//! Application service: the hexagonal core.
//!
//! [`Thermostat`] owns the converter, the hysteresis controller, the safety
//! supervisor and the one piece of persistent state: the commanded
//! [`PumpState`]. All I/O flows through port traits injected at call
//! sites, making the whole loop testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          Thermostat           │
//! ActuatorPort ◀──│ Converter · Safety · Hyst.    │
//!                 └──────────────┬───────────────┘
//!                                ▼
//!                             DelayNs
//! ```

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::ThermostatConfig;
use crate::control::hysteresis::{HysteresisController, PumpState};
use crate::error::Result;
use crate::safety::{FaultTransition, SafetySupervisor};
use crate::sensors::Kelvin;
use crate::sensors::thermistor::ThermistorConverter;

use super::events::{AppEvent, CycleReport};
use super::ports::{ActuatorPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// Thermostat
// ───────────────────────────────────────────────────────────────

/// The control loop for one pump and one thermistor.
pub struct Thermostat {
    config: ThermostatConfig,
    converter: ThermistorConverter,
    controller: HysteresisController,
    safety: SafetySupervisor,
    /// Last state successfully commanded to the pump.
    pump: PumpState,
    last_temperature: Option<Kelvin>,
    interval: Duration,
    tick_count: u64,
}

impl Thermostat {
    /// Construct the loop from a validated configuration.
    ///
    /// Does **not** touch hardware. Call [`start`](Self::start) next.
    pub fn new(config: ThermostatConfig) -> Result<Self> {
        config.validate()?;
        let interval = config.sample_interval()?;
        Ok(Self {
            converter: ThermistorConverter::from_config(&config),
            controller: HysteresisController::new(config.band),
            safety: SafetySupervisor::new(&config),
            pump: PumpState::Off,
            last_temperature: None,
            interval,
            tick_count: 0,
            config,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the pump to its initial `Off` state.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) -> Result<()> {
        hw.command_pump(PumpState::Off)?;
        self.pump = PumpState::Off;
        sink.emit(&AppEvent::Started(self.pump));
        info!(
            "Thermostat started: band {:.3}..{:.3}K, every {:?}",
            self.config.band.min_k, self.config.band.max_k, self.interval
        );
        Ok(())
    }

    /// Kill the pump and report it. Leaves the loop restartable.
    ///
    /// The recorded state is whatever the actuator reports afterwards, so a
    /// relay that refused to switch off still shows as running.
    pub fn shutdown(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_off();
        self.pump = hw.pump_state();
        if self.pump.is_on() {
            warn!("Pump still {} after shutdown", self.pump);
        }
        sink.emit(&AppEvent::Stopped);
        info!("Thermostat stopped after {} cycles", self.tick_count);
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one control cycle: read → convert → safety → decide → actuate.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`]. This avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    ///
    /// Sensor faults never surface as `Err`: the supervisor's fallback
    /// decides the pump state instead. Only a failed pump command does,
    /// and then the recorded state is left at the last one that stuck.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) -> Result<PumpState> {
        self.tick_count += 1;

        // 1. Acquire and convert
        let raw = hw.read_raw();
        let reading = raw.and_then(|sample| self.converter.convert(sample));

        // 2. Safety evaluation
        match self.safety.evaluate(&reading) {
            FaultTransition::Raised(e) => sink.emit(&AppEvent::SensorFault(e)),
            FaultTransition::Cleared => sink.emit(&AppEvent::FaultCleared),
            FaultTransition::Unchanged => {}
        }

        // 3. Decide
        self.last_temperature = reading.ok();
        let next = match reading {
            Ok(t) => self.controller.next_state(t, self.pump),
            Err(_) => self.safety.fallback(self.pump),
        };

        // 4. Actuate (every cycle, even when unchanged)
        if let Err(e) = hw.command_pump(next) {
            warn!("Pump command {} failed: {}", next, e);
            return Err(e.into());
        }

        if next != self.pump {
            sink.emit(&AppEvent::PumpChanged {
                from: self.pump,
                to: next,
                temperature: self.last_temperature,
            });
        }
        self.pump = next;

        sink.emit(&AppEvent::Cycle(CycleReport {
            cycle: self.tick_count,
            raw: raw.ok(),
            temperature: self.last_temperature,
            pump: next,
            faulted: self.safety.has_fault(),
        }));
        Ok(next)
    }

    /// One tick followed by the inter-sample wait.
    ///
    /// The wait happens even when the tick fails, so a stuck relay does
    /// not turn the loop into a busy spin.
    pub fn cycle(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Result<PumpState> {
        let outcome = self.tick(hw, sink);
        wait(delay, self.interval);
        outcome
    }

    /// Run `cycles` full cycles, stopping at the first pump command failure.
    pub fn run_for(
        &mut self,
        cycles: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Result<PumpState> {
        for _ in 0..cycles {
            self.cycle(hw, delay, sink)?;
        }
        debug!("run_for: {} cycles done, pump {}", cycles, self.pump);
        Ok(self.pump)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current commanded pump state.
    pub fn pump_state(&self) -> PumpState {
        self.pump
    }

    /// Temperature from the most recent cycle; `None` before the first
    /// cycle or when its reading was unusable.
    pub fn last_temperature(&self) -> Option<Kelvin> {
        self.last_temperature
    }

    /// Total control ticks executed since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// True while a sensor fault is latched.
    pub fn is_faulted(&self) -> bool {
        self.safety.has_fault()
    }

    /// Time between samples.
    pub fn sample_interval(&self) -> Duration {
        self.interval
    }

    pub fn config(&self) -> &ThermostatConfig {
        &self.config
    }
}

/// Block for `interval`: whole milliseconds in `u32`-sized chunks, then
/// the microsecond and nanosecond tails.
fn wait(delay: &mut impl DelayNs, interval: Duration) {
    let mut millis = interval.as_millis();
    while millis > 0 {
        let chunk = u32::try_from(millis).unwrap_or(u32::MAX);
        delay.delay_ms(chunk);
        millis -= u128::from(chunk);
    }
    let sub_ms_ns = interval.subsec_nanos() % 1_000_000;
    let tail_us = sub_ms_ns / 1000;
    let tail_ns = sub_ms_ns % 1000;
    if tail_us > 0 {
        delay.delay_us(tail_us);
    }
    if tail_ns > 0 {
        delay.delay_ns(tail_ns);
    }
}
