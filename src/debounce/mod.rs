//! Consecutive-sample debounce with tick-timed lockout.
//!
//! The sampling side ([`tracker::Tracker`]) decides *when* a class becomes
//! a command, raising the latch picked by [`lockout_owner`].  The tick side
//! ([`crate::timebase::Timebase`]) walks every lockout slot and lowers each
//! one when its debounce time has run out; a slot nobody raises stays low.

pub mod tracker;

pub use tracker::Tracker;

use crate::app::commands::Channel;
use crate::config::PaddleLockout;

/// Channel whose lockout latch guards `channel`.
///
/// With a shared paddle lockout both paddles use the shift-up slot and the
/// shift-down slot stays idle.
pub const fn lockout_owner(channel: Channel, mode: PaddleLockout) -> Channel {
    match (channel, mode) {
        (Channel::ShiftDown, PaddleLockout::Shared) => Channel::ShiftUp,
        (ch, _) => ch,
    }
}
