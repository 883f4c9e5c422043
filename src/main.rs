//! Thermopump firmware entry point
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                 Adapters (outer ring)                 │
//! │  HardwareAdapter      LogEventSink      Esp32Delay    │
//! │  (Sensor+Actuator)    (EventSink)       (DelayNs)     │
//! │                                                       │
//! │  ────────────── Port Trait Boundary ──────────────    │
//! │                                                       │
//! │  ┌─────────────────────────────────────────────┐      │
//! │  │        Thermostat (pure logic)              │      │
//! │  │  Steinhart-Hart · Safety · Hysteresis       │      │
//! │  └─────────────────────────────────────────────┘      │
//! └───────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use thermopump::adapters::hardware::HardwareAdapter;
use thermopump::adapters::log_sink::LogEventSink;
use thermopump::adapters::time::Esp32Delay;
use thermopump::app::service::Thermostat;
use thermopump::config::ThermostatConfig;
use thermopump::drivers::hw_init::{self, GpioOutput};
use thermopump::drivers::pump::{Polarity, PumpRelay};
use thermopump::pins;
use thermopump::sensors::thermistor::ThermistorInput;

/// Build-time JSON override for the default configuration.
const CONFIG_OVERRIDE: Option<&str> = option_env!("THERMOPUMP_CONFIG_JSON");

fn load_config() -> ThermostatConfig {
    match CONFIG_OVERRIDE.map(ThermostatConfig::from_json) {
        Some(Ok(cfg)) => {
            info!("Config loaded from build-time override");
            cfg
        }
        Some(Err(e)) => {
            warn!("Config override rejected ({}), using defaults", e);
            ThermostatConfig::default()
        }
        None => ThermostatConfig::default(),
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Thermopump v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals()?;

    // ── 3. Configuration ──────────────────────────────────────
    let config = load_config();

    // ── 4. Adapters ───────────────────────────────────────────
    let polarity = if pins::PUMP_RELAY_ACTIVE_LOW {
        Polarity::ActiveLow
    } else {
        Polarity::ActiveHigh
    };
    let relay = PumpRelay::new(GpioOutput::new(pins::PUMP_RELAY_GPIO), polarity);
    let thermistor = ThermistorInput::new(pins::THERMISTOR_ADC_GPIO, config.circuit.adc_max);
    let mut hw = HardwareAdapter::new(thermistor, relay);
    let mut sink = LogEventSink::new();
    let mut delay = Esp32Delay::new();

    // ── 5. Control loop ───────────────────────────────────────
    let mut thermostat = Thermostat::new(config)?;
    thermostat.start(&mut hw, &mut sink)?;

    info!("System ready. Entering control loop.");
    loop {
        if let Err(e) = thermostat.cycle(&mut hw, &mut delay, &mut sink) {
            warn!("Control cycle failed: {}", e);
        }
    }
}
