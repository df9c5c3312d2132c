//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing shifter events to the logger (UART /
//! USB-CDC in production).

use log::{error, info};

use crate::app::events::ShifterEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ShifterEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ShifterEvent) {
        match event {
            ShifterEvent::StartupComplete => {
                info!("START | input accepted");
            }
            ShifterEvent::OutputChanged { signal, active } => {
                info!("OUT   | {:?} -> {}", signal, if *active { "on" } else { "off" });
            }
            ShifterEvent::FaultLatched(fault) => {
                error!("FAULT | {} (code {})", fault, fault.code());
            }
        }
    }
}
