//! Application core: pure domain logic, zero I/O.
//!
//! The control loop (sample → convert → decide → actuate → wait) lives in
//! [`service`]. All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable without
//! real peripherals.

pub mod events;
pub mod ports;
pub mod service;
