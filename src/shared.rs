//! State shared between the sampling handler, the timebase tick and the
//! main loop.
//!
//! ```text
//!   ┌──────────────┐  raise   ┌─────────────┐  lower   ┌──────────────┐
//!   │ sample ISR   │─────────▶│ SharedState │◀─────────│ tick ISR     │
//!   │ (tracker,    │          │  lockouts   │          │ (timebase)   │
//!   │  relay)      │          │  holds      │          └──────────────┘
//!   └──────────────┘          │  pulses     │  lower   ┌──────────────┐
//!                             │  horn       │◀─────────│ main loop    │
//!                             └─────────────┘   read   └──────────────┘
//! ```
//!
//! No field has two writers.  A boolean that one context sets and another
//! clears is a [`Latch`]: two counters, each owned by one side, with the
//! flag defined as "raised != lowered".  Counters that only one context
//! touches (consecutive samples, elapsed ticks) are not in here at all;
//! they live in the handler that owns them.
//!
//! A single [`SharedState`] is built once at start-up (typically in a
//! `static`) and handed to every handler as `&'static SharedState`.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use crate::app::commands::Channel;
use crate::error::HardwareFault;

/// Single-writer-per-edge flag.
///
/// One context may only call [`raise`](Self::raise); the other may only call
/// [`lower`](Self::lower) / [`acknowledge`](Self::acknowledge).  A raise that
/// lands after the lowering side sampled [`pending`](Self::pending) is never
/// lost, because `acknowledge` only retires the sequence number it saw.
pub struct Latch {
    raised: AtomicU32,
    lowered: AtomicU32,
}

impl Latch {
    pub const fn new() -> Self {
        Self {
            raised: AtomicU32::new(0),
            lowered: AtomicU32::new(0),
        }
    }

    /// Raise side only.
    pub fn raise(&self) {
        let next = self.raised.load(Ordering::Relaxed).wrapping_add(1);
        self.raised.store(next, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.pending().is_some()
    }

    /// Sequence number of the latest raise, if not yet lowered.
    pub fn pending(&self) -> Option<u32> {
        let raised = self.raised.load(Ordering::Acquire);
        (raised != self.lowered.load(Ordering::Acquire)).then_some(raised)
    }

    /// Lower side only: retire every raise seen so far.
    pub fn lower(&self) {
        let raised = self.raised.load(Ordering::Acquire);
        self.lowered.store(raised, Ordering::Release);
    }

    /// Lower side only: retire raises up to `seq` (from [`pending`](Self::pending)).
    pub fn acknowledge(&self, seq: u32) {
        self.lowered.store(seq, Ordering::Release);
    }
}

impl Default for Latch {
    fn default() -> Self {
        Self::new()
    }
}

/// Power-on warm-up gate.  Written only by the timebase; never closes again.
pub struct StartupGate {
    open: AtomicBool,
}

impl StartupGate {
    pub const fn new() -> Self {
        Self {
            open: AtomicBool::new(false),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub(crate) fn open(&self) {
        self.open.store(true, Ordering::Release);
    }
}

impl Default for StartupGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Hand-off between the command relay and the output loop.
pub struct OutputCommandFlags {
    shift_up_pending: Latch,
    shift_down_pending: Latch,
    /// Relay is the only writer.
    horn_active: AtomicBool,
}

impl OutputCommandFlags {
    pub const fn new() -> Self {
        Self {
            shift_up_pending: Latch::new(),
            shift_down_pending: Latch::new(),
            horn_active: AtomicBool::new(false),
        }
    }

    /// Pending-pulse latch for a paddle; `None` for the horn.
    pub fn pulse(&self, channel: Channel) -> Option<&Latch> {
        match channel {
            Channel::ShiftUp => Some(&self.shift_up_pending),
            Channel::ShiftDown => Some(&self.shift_down_pending),
            Channel::Horn => None,
        }
    }

    pub fn horn_active(&self) -> bool {
        self.horn_active.load(Ordering::Acquire)
    }

    pub(crate) fn set_horn(&self, on: bool) {
        self.horn_active.store(on, Ordering::Release);
    }
}

impl Default for OutputCommandFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything touched by more than one execution context.
pub struct SharedState {
    pub startup: StartupGate,
    /// Debounce lockout per channel: sampling raises, tick lowers.
    lockouts: [Latch; 3],
    /// Paddle hold windows: relay raises, tick lowers.
    holds: [Latch; 2],
    pub outputs: OutputCommandFlags,
    /// Burst processed: sampling raises, conversion pacer lowers.
    conversion_done: Latch,
    /// Latched [`HardwareFault`] code; sampling context only.
    fault: AtomicU8,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            startup: StartupGate::new(),
            lockouts: [Latch::new(), Latch::new(), Latch::new()],
            holds: [Latch::new(), Latch::new()],
            outputs: OutputCommandFlags::new(),
            conversion_done: Latch::new(),
            fault: AtomicU8::new(0),
        }
    }

    pub fn lockout(&self, channel: Channel) -> &Latch {
        &self.lockouts[channel.index()]
    }

    /// Hold window for a paddle; `None` for the horn.
    pub fn hold(&self, channel: Channel) -> Option<&Latch> {
        match channel {
            Channel::ShiftUp => Some(&self.holds[0]),
            Channel::ShiftDown => Some(&self.holds[1]),
            Channel::Horn => None,
        }
    }

    pub fn conversion_done(&self) -> &Latch {
        &self.conversion_done
    }

    pub fn fault(&self) -> Option<HardwareFault> {
        HardwareFault::from_code(self.fault.load(Ordering::Acquire))
    }

    pub(crate) fn latch_fault(&self, fault: HardwareFault) {
        self.fault.store(fault.code(), Ordering::Release);
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
