//! Thermopump firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod pins;
pub mod safety;
pub mod sensors;

// The ESP-IDF-only pieces are cfg-guarded inside; host builds get
// simulation stubs so the crate compiles and tests everywhere.
pub mod adapters;
pub mod drivers;
