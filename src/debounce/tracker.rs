//! Per-channel consecutive-sample tracker.
//!
//! Runs in the sampling context, once per averaged sample (or several times
//! when `observations_per_sample > 1`).
//!
//! | Observed class     | Effect                                              |
//! |--------------------|-----------------------------------------------------|
//! | Idle               | all counts cleared, `HornOff` emitted               |
//! | channel in lockout | other counts cleared, nothing accepted              |
//! | channel free       | other counts cleared, own count +1, accept at N     |
//!
//! Accepting resets the count and raises the channel's lockout latch; only
//! the timebase can lower it again.  An Idle sample never touches lockouts
//! or paddle hold windows.

use log::debug;

use super::lockout_owner;
use crate::app::commands::{Channel, Command};
use crate::config::{PaddleLockout, ShifterConfig};
use crate::shared::SharedState;
use crate::signal::SignalClass;

pub struct Tracker<'a> {
    shared: &'a SharedState,
    /// Consecutive in-class samples, indexed by [`Channel::index`].
    consecutive: [u32; 3],
    required: [u32; 3],
    paddle_lockout: PaddleLockout,
}

impl<'a> Tracker<'a> {
    pub fn new(shared: &'a SharedState, config: &ShifterConfig) -> Self {
        Self {
            shared,
            consecutive: [0; 3],
            required: Channel::ALL.map(|ch| config.hold_samples(ch)),
            paddle_lockout: config.paddle_lockout,
        }
    }

    /// Feed one classification.  Returns the command accepted (or the Idle
    /// release), if any.
    pub fn observe(&mut self, class: SignalClass) -> Option<Command> {
        if !self.shared.startup.is_open() {
            return None;
        }

        let Some(channel) = class.channel() else {
            self.consecutive = [0; 3];
            return Some(Command::HornOff);
        };

        for other in Channel::ALL {
            if other != channel {
                self.consecutive[other.index()] = 0;
            }
        }

        let lockout = self
            .shared
            .lockout(lockout_owner(channel, self.paddle_lockout));
        if lockout.is_set() {
            return None;
        }

        let count = &mut self.consecutive[channel.index()];
        *count = count.saturating_add(1);
        if *count < self.required[channel.index()] {
            return None;
        }

        *count = 0;
        lockout.raise();
        debug!("tracker: {:?} accepted", channel);
        Some(Command::accepted(channel))
    }

    /// Current consecutive-sample count for a channel.
    pub fn consecutive(&self, channel: Channel) -> u32 {
        self.consecutive[channel.index()]
    }
}
