//! Integration tests: unusable readings, fallback policy, actuator failures.

use super::mock_hw::{MockHardware, RecordingDelay, RecordingSink};

use thermopump::app::events::AppEvent;
use thermopump::app::ports::ActuatorPort;
use thermopump::app::service::Thermostat;
use thermopump::config::{FaultPolicy, ThermostatConfig};
use thermopump::control::hysteresis::PumpState;
use thermopump::error::{ActuatorError, Error, SensorError};

const RAW_250K: u16 = 1006;
const RAW_294K: u16 = 876;

fn make_loop(policy: FaultPolicy) -> (Thermostat, RecordingSink) {
    let mut config = ThermostatConfig::default();
    config.fault_policy = policy;
    let mut thermostat = Thermostat::new(config).unwrap();
    let mut sink = RecordingSink::new();
    thermostat.start(&mut MockHardware::new(), &mut sink).unwrap();
    (thermostat, sink)
}

#[test]
fn zero_sample_is_signalled_not_decided() {
    let (mut t, mut sink) = make_loop(FaultPolicy::ForceOff);
    let mut hw = MockHardware::with_samples(&[0]);

    assert_eq!(t.tick(&mut hw, &mut sink).unwrap(), PumpState::Off);
    assert!(t.is_faulted());
    assert!(t.last_temperature().is_none());
    assert_eq!(sink.faults(), vec![SensorError::NonPositiveResistance]);
}

#[test]
fn full_scale_sample_is_signalled() {
    let (mut t, mut sink) = make_loop(FaultPolicy::ForceOff);
    let mut hw = MockHardware::with_samples(&[1023]);

    t.tick(&mut hw, &mut sink).unwrap();
    assert_eq!(sink.faults(), vec![SensorError::OutOfRange(1023)]);
}

#[test]
fn force_off_policy_stops_running_pump() {
    let (mut t, mut sink) = make_loop(FaultPolicy::ForceOff);
    let mut hw = MockHardware::with_samples(&[RAW_250K, 1023]);

    assert_eq!(t.tick(&mut hw, &mut sink).unwrap(), PumpState::On);
    assert_eq!(t.tick(&mut hw, &mut sink).unwrap(), PumpState::Off);

    let fallback = sink.events.iter().any(|e| {
        matches!(
            e,
            AppEvent::PumpChanged {
                from: PumpState::On,
                to: PumpState::Off,
                temperature: None,
            }
        )
    });
    assert!(fallback, "fault fallback change must carry no temperature");
}

#[test]
fn hold_last_policy_keeps_pump_running() {
    let (mut t, mut sink) = make_loop(FaultPolicy::HoldLast);
    let mut hw = MockHardware::with_samples(&[RAW_250K, 1023, 1023]);

    t.tick(&mut hw, &mut sink).unwrap();
    assert_eq!(t.tick(&mut hw, &mut sink).unwrap(), PumpState::On);
    assert_eq!(t.tick(&mut hw, &mut sink).unwrap(), PumpState::On);
    assert_eq!(sink.faults().len(), 1, "a persisting fault is reported once");
}

#[test]
fn good_reading_clears_fault_and_resumes_control() {
    let (mut t, mut sink) = make_loop(FaultPolicy::ForceOff);
    let mut hw = MockHardware::with_samples(&[0, 0, RAW_250K]);

    t.tick(&mut hw, &mut sink).unwrap();
    t.tick(&mut hw, &mut sink).unwrap();
    assert!(t.is_faulted());

    assert_eq!(t.tick(&mut hw, &mut sink).unwrap(), PumpState::On);
    assert!(!t.is_faulted());
    assert_eq!(sink.count_cleared(), 1);
}

#[test]
fn adc_failure_uses_fallback() {
    let (mut t, mut sink) = make_loop(FaultPolicy::ForceOff);
    let mut hw = MockHardware::with_samples(&[RAW_250K]);
    hw.push_read_error(SensorError::AdcReadFailed);

    t.tick(&mut hw, &mut sink).unwrap();
    assert_eq!(t.tick(&mut hw, &mut sink).unwrap(), PumpState::Off);
    assert_eq!(sink.faults(), vec![SensorError::AdcReadFailed]);
}

#[test]
fn failed_pump_command_is_an_error_and_keeps_state() {
    let (mut t, mut sink) = make_loop(FaultPolicy::ForceOff);
    let mut hw = MockHardware::with_samples(&[RAW_250K]);
    hw.fail_writes = true;

    assert_eq!(
        t.tick(&mut hw, &mut sink),
        Err(Error::Actuator(ActuatorError::GpioWriteFailed))
    );
    assert_eq!(t.pump_state(), PumpState::Off);
    assert!(sink.pump_changes().is_empty());

    hw.fail_writes = false;
    assert_eq!(t.tick(&mut hw, &mut sink).unwrap(), PumpState::On);
}

#[test]
fn failed_cycle_still_waits() {
    let (mut t, mut sink) = make_loop(FaultPolicy::ForceOff);
    let mut hw = MockHardware::with_samples(&[RAW_294K]);
    hw.fail_writes = true;
    let mut delay = RecordingDelay::default();

    assert!(t.cycle(&mut hw, &mut delay, &mut sink).is_err());
    assert_eq!(delay.total_us, 1_000_000);

    assert!(t.run_for(3, &mut hw, &mut delay, &mut sink).is_err());
    assert_eq!(t.tick_count(), 2, "run_for stops at the first failure");
}

#[test]
fn shutdown_with_stuck_relay_reports_pump_running() {
    let (mut t, mut sink) = make_loop(FaultPolicy::ForceOff);
    let mut hw = MockHardware::with_samples(&[RAW_250K]);

    assert_eq!(t.tick(&mut hw, &mut sink).unwrap(), PumpState::On);
    hw.fail_writes = true;
    t.shutdown(&mut hw, &mut sink);

    assert_eq!(hw.all_off_calls, 1);
    assert_eq!(t.pump_state(), PumpState::On);
    assert_eq!(t.pump_state(), hw.pump_state());
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped));
}
