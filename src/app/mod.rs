//! Application core: the shifter handlers and their port boundary.
//!
//! The handlers in [`service`] own no hardware.  Every interaction with the
//! board goes through the **port traits** in [`ports`], so the whole signal
//! path is testable on the host.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
