//! Outbound events.
//!
//! Emitted from the main-loop side through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters decide where they
//! go (serial log, test recorder).

use super::ports::Signal;
use crate::error::HardwareFault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShifterEvent {
    /// Warm-up finished; ADC input is now accepted.
    StartupComplete,

    /// An output line changed logical state.
    OutputChanged { signal: Signal, active: bool },

    /// A hardware fault was latched; outputs forced safe.
    FaultLatched(HardwareFault),
}
