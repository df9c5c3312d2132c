//! Command relay: turns accepted commands into output hand-off state.
//!
//! Runs in the sampling context.  For a shift command the hold window is
//! raised *before* the pending flag, so the main loop can never see a
//! pending pulse whose hold has not started yet.

use log::trace;

use crate::app::commands::{Channel, Command};
use crate::shared::SharedState;

pub struct CommandRelay<'a> {
    shared: &'a SharedState,
}

impl<'a> CommandRelay<'a> {
    pub fn new(shared: &'a SharedState) -> Self {
        Self { shared }
    }

    pub fn apply(&self, command: Command) {
        match command {
            Command::ShiftUp => self.start_pulse(Channel::ShiftUp),
            Command::ShiftDown => self.start_pulse(Channel::ShiftDown),
            Command::HornOn => self.shared.outputs.set_horn(true),
            Command::HornOff => self.shared.outputs.set_horn(false),
        }
    }

    fn start_pulse(&self, channel: Channel) {
        if let (Some(hold), Some(pending)) =
            (self.shared.hold(channel), self.shared.outputs.pulse(channel))
        {
            hold.raise();
            pending.raise();
            trace!("relay: {:?} pulse started", channel);
        }
    }
}
