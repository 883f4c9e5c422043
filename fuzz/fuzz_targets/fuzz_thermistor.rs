//! Fuzz target: `ThermistorConverter::convert` + `HysteresisController`
//!
//! Drives arbitrary samples through converters built from arbitrary
//! divider circuits and asserts that conversion never panics, never
//! returns a non-finite temperature as `Ok`, and that the controller's
//! decision for any accepted reading honours the band.
//!
//! cargo fuzz run fuzz_thermistor

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermopump::config::{DividerCircuit, TargetBand, ThermistorModel};
use thermopump::control::hysteresis::{HysteresisController, PumpState};
use thermopump::sensors::thermistor::ThermistorConverter;
use thermopump::sensors::RawSample;

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }
    let raw = u16::from_le_bytes([data[0], data[1]]);
    let adc_max = u16::from_le_bytes([data[2], data[3]]).max(1);
    let pull_up = f64::from(u16::from_le_bytes([data[4], data[5]]).max(1));

    let circuit = DividerCircuit {
        pull_up_ohms: pull_up,
        v_ref: 3.3,
        adc_max,
    };
    let converter = ThermistorConverter::new(ThermistorModel::default(), circuit);
    let controller = HysteresisController::new(TargetBand::default());
    let band = TargetBand::default();

    if let Ok(t) = converter.convert(RawSample(raw)) {
        assert!(t.value().is_finite() && t.value() > 0.0, "degenerate Ok: {t:?}");
        assert!(raw > 0 && raw < adc_max);

        for state in [PumpState::Off, PumpState::On] {
            let next = controller.next_state(t, state);
            if t.value() < band.min_k {
                assert_eq!(next, PumpState::On);
            } else if t.value() > band.max_k {
                assert_eq!(next, PumpState::Off);
            } else {
                assert_eq!(next, state);
            }
        }
    }
});
