//! Control law: the pump on/off decision.

pub mod hysteresis;
