//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                  |
//! |------------|---------------|------------------------------|
//! | `hardware` | SensorPort    | ESP32 ADC1 (thermistor)      |
//! |            | ActuatorPort  | GPIO pump relay              |
//! | `log_sink` | EventSink     | Serial log output            |
//! | `time`     | DelayNs       | FreeRTOS delay / host sleep  |

pub mod hardware;
pub mod log_sink;
pub mod time;
