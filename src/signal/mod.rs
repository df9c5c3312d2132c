//! Analog signal front end: burst averaging and band classification.
//!
//! The horn wire carries one voltage whose level encodes which control is
//! pressed.  A burst of raw conversions is reduced to one averaged code
//! ([`burst`]), which is then mapped onto a [`SignalClass`] ([`classifier`]).

pub mod burst;
pub mod classifier;

pub use classifier::classify;

use crate::app::commands::Channel;

/// Result of classifying one averaged sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalClass {
    ShiftUp,
    ShiftDown,
    HornOn,
    /// Outside every configured band.
    Idle,
}

impl SignalClass {
    /// Tracked channel for this class; `None` for Idle.
    pub const fn channel(self) -> Option<Channel> {
        match self {
            Self::ShiftUp => Some(Channel::ShiftUp),
            Self::ShiftDown => Some(Channel::ShiftDown),
            Self::HornOn => Some(Channel::Horn),
            Self::Idle => None,
        }
    }
}
