//! Integration tests: sensor sample → converter → controller → pump command.

use super::mock_hw::{MockHardware, RecordingDelay, RecordingSink};

use thermopump::adapters::log_sink::LogEventSink;
use thermopump::app::events::AppEvent;
use thermopump::app::service::Thermostat;
use thermopump::config::ThermostatConfig;
use thermopump::control::hysteresis::PumpState;
use thermopump::sensors::Kelvin;
use thermopump::sensors::thermistor::ThermistorConverter;

// Samples for the default divider and coefficients.
const RAW_250K: u16 = 1006;
const RAW_294K: u16 = 876;
const RAW_330K: u16 = 596;

fn make_loop() -> (Thermostat, RecordingSink) {
    let mut thermostat = Thermostat::new(ThermostatConfig::default()).unwrap();
    let mut sink = RecordingSink::new();
    thermostat.start(&mut MockHardware::new(), &mut sink).unwrap();
    (thermostat, sink)
}

fn raw_for(kelvin: f64) -> u16 {
    ThermistorConverter::from_config(&ThermostatConfig::default())
        .sample_for(Kelvin::new(kelvin))
        .expect("temperature representable by the divider")
        .0
}

// ── Startup ──────────────────────────────────────────────────

#[test]
fn start_commands_pump_off() {
    let mut thermostat = Thermostat::new(ThermostatConfig::default()).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    thermostat.start(&mut hw, &mut sink).unwrap();

    assert_eq!(hw.commands, vec![PumpState::Off]);
    assert_eq!(sink.events, vec![AppEvent::Started(PumpState::Off)]);
}

// ── Decision scenarios ───────────────────────────────────────

#[test]
fn cold_reading_turns_pump_on() {
    let (mut t, mut sink) = make_loop();
    let mut hw = MockHardware::with_samples(&[RAW_250K]);

    assert_eq!(t.tick(&mut hw, &mut sink).unwrap(), PumpState::On);
    assert_eq!(hw.commands, vec![PumpState::On]);
    assert_eq!(sink.pump_changes(), vec![(PumpState::Off, PumpState::On)]);
    let temp = t.last_temperature().unwrap().value();
    assert!((temp - 250.0).abs() < 2.0);
}

#[test]
fn hot_reading_turns_running_pump_off() {
    let (mut t, mut sink) = make_loop();
    let mut hw = MockHardware::with_samples(&[RAW_250K, RAW_330K]);

    t.tick(&mut hw, &mut sink).unwrap();
    assert_eq!(t.tick(&mut hw, &mut sink).unwrap(), PumpState::Off);
    assert_eq!(hw.commands, vec![PumpState::On, PumpState::Off]);
}

#[test]
fn target_reading_holds_running_pump() {
    let (mut t, mut sink) = make_loop();
    let mut hw = MockHardware::with_samples(&[RAW_250K, RAW_294K]);

    t.tick(&mut hw, &mut sink).unwrap();
    assert_eq!(t.tick(&mut hw, &mut sink).unwrap(), PumpState::On);
}

#[test]
fn target_reading_holds_stopped_pump() {
    let (mut t, mut sink) = make_loop();
    let mut hw = MockHardware::with_samples(&[RAW_294K]);

    assert_eq!(t.tick(&mut hw, &mut sink).unwrap(), PumpState::Off);
    assert!(sink.pump_changes().is_empty());
}

#[test]
fn target_sample_is_inside_dead_band() {
    let config = ThermostatConfig::default();
    let raw = raw_for(config.band.target_k);
    let t = ThermistorConverter::from_config(&config)
        .convert(raw.into())
        .unwrap();
    assert!(config.band.contains(t.value()));
}

#[test]
fn pump_is_commanded_every_cycle() {
    let (mut t, mut sink) = make_loop();
    let mut hw = MockHardware::with_samples(&[RAW_294K; 5]);

    for _ in 0..5 {
        t.tick(&mut hw, &mut sink).unwrap();
    }
    assert_eq!(hw.commands, vec![PumpState::Off; 5]);
    assert_eq!(t.tick_count(), 5);
}

// ── Hysteresis over a sweep ──────────────────────────────────

#[test]
fn sweep_through_band_switches_only_at_thresholds() {
    let (mut t, mut sink) = make_loop();
    let mut hw = MockHardware::new();

    // 250 K → 340 K, then back down to 280 K (inside the band).
    let up = (250..=340).step_by(2);
    let down = (280..340).rev().step_by(2);
    for kelvin in up.chain(down) {
        hw.push_sample(raw_for(f64::from(kelvin)));
    }
    let cycles = (250..=340).step_by(2).count() + (280..340).rev().step_by(2).count();

    for _ in 0..cycles {
        t.tick(&mut hw, &mut sink).unwrap();
    }

    assert_eq!(hw.switch_count(), 2, "on at the low edge, off at the high edge");
    assert_eq!(
        sink.pump_changes(),
        vec![(PumpState::Off, PumpState::On), (PumpState::On, PumpState::Off)]
    );
    assert_eq!(t.pump_state(), PumpState::Off);
}

#[test]
fn oscillation_inside_band_never_switches() {
    let (mut t, mut sink) = make_loop();
    let mut hw = MockHardware::new();
    for i in 0..40 {
        let kelvin = if i % 2 == 0 { 270.0 } else { 318.0 };
        hw.push_sample(raw_for(kelvin));
    }

    for _ in 0..40 {
        t.tick(&mut hw, &mut sink).unwrap();
    }
    assert_eq!(hw.switch_count(), 0);
}

// ── Cadence ───────────────────────────────────────────────────

#[test]
fn run_for_waits_one_interval_per_cycle() {
    let (mut t, mut sink) = make_loop();
    let mut hw = MockHardware::with_samples(&[RAW_294K]);
    let mut delay = RecordingDelay::default();

    t.run_for(10, &mut hw, &mut delay, &mut sink).unwrap();

    assert_eq!(t.tick_count(), 10);
    assert_eq!(delay.total_us, 10_000_000);
}

#[test]
fn non_integer_frequency_interval_is_exact() {
    let mut config = ThermostatConfig::default();
    config.sample_frequency_hz = 4.0;
    let mut t = Thermostat::new(config).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut delay = RecordingDelay::default();

    t.run_for(4, &mut hw, &mut delay, &mut sink).unwrap();

    assert_eq!(delay.total_us, 1_000_000);
}

#[test]
fn runs_against_log_sink() {
    let mut t = Thermostat::new(ThermostatConfig::default()).unwrap();
    let mut hw = MockHardware::with_samples(&[RAW_250K, RAW_294K, RAW_330K, 0, RAW_294K]);
    let mut sink = LogEventSink::new();
    let mut delay = RecordingDelay::default();

    t.start(&mut hw, &mut sink).unwrap();
    t.run_for(5, &mut hw, &mut delay, &mut sink).unwrap();
    t.shutdown(&mut hw, &mut sink);

    assert_eq!(hw.all_off_calls, 1);
    assert_eq!(t.pump_state(), PumpState::Off);
}
