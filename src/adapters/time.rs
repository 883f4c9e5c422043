//! ESP32 delay adapter.
//!
//! Provides the blocking wait between control cycles.
//!
//! - **`target_os = "espidf"`**: yields to FreeRTOS through
//!   `esp_idf_hal::delay::FreeRtos` for millisecond waits and
//!   busy-waits the sub-millisecond tail with `Ets`.
//! - **`not(target_os = "espidf")`**: uses `std::thread::sleep` for
//!   host-side simulation.

use embedded_hal::delay::DelayNs;

/// Delay adapter for the ESP32-S3 platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct Esp32Delay;

impl Esp32Delay {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "espidf")]
impl DelayNs for Esp32Delay {
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::Ets::delay_us(ns.div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        esp_idf_hal::delay::Ets::delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for Esp32Delay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
