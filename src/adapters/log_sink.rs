//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC on the device). Per-cycle reports go out at
//! debug level so a 1 Hz loop does not flood the console.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Cycle(r) => match r.temperature {
                Some(t) => debug!(
                    "CYCLE | #{} | raw={} | T={} | pump={}",
                    r.cycle,
                    r.raw.map_or(0, |s| s.0),
                    t,
                    r.pump
                ),
                None => debug!(
                    "CYCLE | #{} | raw={:?} | T=n/a | pump={} | faulted={}",
                    r.cycle,
                    r.raw.map(|s| s.0),
                    r.pump,
                    r.faulted
                ),
            },
            AppEvent::PumpChanged { from, to, temperature } => match temperature {
                Some(t) => info!("PUMP | {} -> {} at {}", from, to, t),
                None => info!("PUMP | {} -> {} (fault fallback)", from, to),
            },
            AppEvent::SensorFault(e) => {
                warn!("FAULT | sensor: {}", e);
            }
            AppEvent::FaultCleared => {
                info!("FAULT | cleared");
            }
            AppEvent::Started(state) => {
                info!("START | pump={}", state);
            }
            AppEvent::Stopped => {
                info!("STOP | pump forced off");
            }
        }
    }
}
