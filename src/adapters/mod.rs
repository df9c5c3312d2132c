//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter       | Implements     | Connects to                     |
//! |---------------|----------------|---------------------------------|
//! | `log_sink`    | EventSink      | Serial log output               |
//! | `pin_outputs` | DigitalOutput  | `embedded-hal` output pins      |
//!
//! The ADC and watchdog adapters live in [`crate::drivers`] because they
//! talk to ESP-IDF directly.

pub mod log_sink;
pub mod pin_outputs;
