//! One-shot hardware peripheral initialization.
//!
//! Configures the thermistor ADC channel and the pump relay GPIO using raw
//! ESP-IDF sys calls. Called once from `main()` before the control loop
//! starts. On host targets every call is a simulation no-op.

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};

#[cfg(target_os = "espidf")]
use esp_idf_sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_relay_output()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

pub const ADC1_CH_THERMISTOR: u32 = 8;

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// control-loop ADC read path. `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    // 12 dB attenuation covers the full 0 – 3.3 V divider swing.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), ADC1_CH_THERMISTOR, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    info!(
        "hw_init: ADC1 configured (CH{}=thermistor, GPIO{})",
        ADC1_CH_THERMISTOR,
        pins::THERMISTOR_ADC_GPIO
    );
    Ok(())
}

/// Read one native 12-bit sample. `None` if the driver reports an error.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Option<u16> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: single-threaded control-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return None;
    }
    Some(raw.max(0) as u16)
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_relay_output() -> Result<(), HwInitError> {
    let pin = pins::PUMP_RELAY_GPIO;
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }

    // Park the relay de-energised before the loop takes over.
    let idle_level = u32::from(pins::PUMP_RELAY_ACTIVE_LOW);
    let ret = unsafe { gpio_set_level(pin, idle_level) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }

    info!("hw_init: pump relay output configured (GPIO{})", pin);
    Ok(())
}

/// Map an `esp_err_t` from a level write onto an embedded-hal error.
/// `ESP_OK` is zero.
fn level_write_result(rc: i32) -> Result<(), ErrorKind> {
    if rc == 0 {
        Ok(())
    } else {
        Err(ErrorKind::Other)
    }
}

/// A configured GPIO output, usable wherever an `embedded_hal` pin is.
///
/// The tracked level only changes once the write succeeds. On host targets
/// the level lives in memory, and [`sim_set_write_rc`](Self::sim_set_write_rc)
/// injects driver failures.
pub struct GpioOutput {
    gpio: i32,
    high: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_rc: i32,
}

impl GpioOutput {
    pub fn new(gpio: i32) -> Self {
        Self {
            gpio,
            high: false,
            #[cfg(not(target_os = "espidf"))]
            sim_rc: 0,
        }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    /// Last level written successfully.
    pub fn is_set_high(&self) -> bool {
        self.high
    }

    /// Return code every following simulated write reports (0 = success).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_write_rc(&mut self, rc: i32) {
        self.sim_rc = rc;
    }

    #[cfg(target_os = "espidf")]
    fn write(&mut self, high: bool) -> Result<(), ErrorKind> {
        // SAFETY: gpio_set_level writes to an already-configured output pin;
        // the pin was validated during init_relay_output(). Main-loop only.
        let rc = unsafe { gpio_set_level(self.gpio, u32::from(high)) };
        if let Err(e) = level_write_result(rc) {
            log::error!("gpio_set_level(GPIO{}) failed (rc={})", self.gpio, rc);
            return Err(e);
        }
        self.high = high;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn write(&mut self, high: bool) -> Result<(), ErrorKind> {
        level_write_result(self.sim_rc)?;
        self.high = high;
        Ok(())
    }
}

impl ErrorType for GpioOutput {
    type Error = ErrorKind;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), ErrorKind> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), ErrorKind> {
        self.write(true)
    }
}
