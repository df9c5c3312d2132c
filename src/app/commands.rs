//! Commands produced by the debounce tracker and consumed by the relay.

/// One of the three tracked input channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    ShiftUp,
    ShiftDown,
    Horn,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::ShiftUp, Channel::ShiftDown, Channel::Horn];

    /// Dense index for per-channel arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::ShiftUp => 0,
            Self::ShiftDown => 1,
            Self::Horn => 2,
        }
    }

    /// Paddle channels drive timed pulses; the horn is a level.
    pub const fn is_paddle(self) -> bool {
        matches!(self, Self::ShiftUp | Self::ShiftDown)
    }
}

/// Accepted command, emitted at most once per channel per observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a shift-up pulse.
    ShiftUp,
    /// Start a shift-down pulse.
    ShiftDown,
    /// Switch the horn on.
    HornOn,
    /// Release emitted on every Idle sample: horn off.
    HornOff,
}

impl Command {
    /// The command a channel emits when it accepts.
    pub const fn accepted(channel: Channel) -> Self {
        match channel {
            Channel::ShiftUp => Self::ShiftUp,
            Channel::ShiftDown => Self::ShiftDown,
            Channel::Horn => Self::HornOn,
        }
    }
}
