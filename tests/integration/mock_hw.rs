//! Mock hardware adapter for integration tests.
//!
//! Serves scripted ADC samples and records every pump command so tests
//! can assert on the full command history without touching real GPIO.

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use thermopump::app::events::AppEvent;
use thermopump::app::ports::{ActuatorPort, EventSink, SensorPort};
use thermopump::control::hysteresis::PumpState;
use thermopump::error::{ActuatorError, SensorError};
use thermopump::sensors::RawSample;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Samples served in order; the last one repeats once drained.
    samples: VecDeque<Result<RawSample, SensorError>>,
    last_sample: Result<RawSample, SensorError>,
    pub commands: Vec<PumpState>,
    pub fail_writes: bool,
    pub all_off_calls: u32,
    state: PumpState,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::new(),
            last_sample: Ok(RawSample(876)),
            commands: Vec::new(),
            fail_writes: false,
            all_off_calls: 0,
            state: PumpState::Off,
        }
    }

    pub fn with_samples(raws: &[u16]) -> Self {
        let mut hw = Self::new();
        for &raw in raws {
            hw.push_sample(raw);
        }
        hw
    }

    pub fn push_sample(&mut self, raw: u16) {
        self.samples.push_back(Ok(RawSample(raw)));
    }

    pub fn push_read_error(&mut self, e: SensorError) {
        self.samples.push_back(Err(e));
    }

    /// Number of on/off transitions in the command history.
    pub fn switch_count(&self) -> usize {
        let mut prev = PumpState::Off;
        let mut switches = 0;
        for &cmd in &self.commands {
            if cmd != prev {
                switches += 1;
                prev = cmd;
            }
        }
        switches
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        if let Some(next) = self.samples.pop_front() {
            self.last_sample = next;
        }
        self.last_sample
    }
}

impl ActuatorPort for MockHardware {
    fn command_pump(&mut self, state: PumpState) -> Result<(), ActuatorError> {
        if self.fail_writes {
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.commands.push(state);
        self.state = state;
        Ok(())
    }

    fn pump_state(&self) -> PumpState {
        self.state
    }

    fn all_off(&mut self) {
        self.all_off_calls += 1;
        if !self.fail_writes {
            self.state = PumpState::Off;
        }
    }
}

// ── RecordingDelay ────────────────────────────────────────────

/// Delay that returns immediately and remembers how long it was asked to wait.
#[derive(Default)]
pub struct RecordingDelay {
    pub total_us: u64,
    pub calls: u32,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.total_us += u64::from(ns) / 1000;
    }

    fn delay_us(&mut self, us: u32) {
        self.calls += 1;
        self.total_us += u64::from(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls += 1;
        self.total_us += u64::from(ms) * 1000;
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pump_changes(&self) -> Vec<(PumpState, PumpState)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::PumpChanged { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn faults(&self) -> Vec<SensorError> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::SensorFault(err) => Some(*err),
                _ => None,
            })
            .collect()
    }

    pub fn count_cleared(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::FaultCleared))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
