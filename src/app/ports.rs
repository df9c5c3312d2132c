//! Port traits: the boundary between the shifter logic and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ handlers (domain)
//! ```
//!
//! Peripheral drivers (ADC, GPIO, watchdog) implement these traits.  The
//! handlers in [`service`](super::service) consume them via generics, so
//! the domain code never touches registers and runs unchanged against the
//! recording mocks in the integration tests.

use super::events::ShifterEvent;

// ───────────────────────────────────────────────────────────────
// ADC port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Burst-mode analog converter on the horn wire.
pub trait AdcSource {
    /// Kick off the next conversion burst.
    fn start_conversion(&mut self);

    /// Discard whatever is left in the conversion FIFO.
    fn reset_buffer(&mut self);

    /// Copy the finished burst into `buf`.
    ///
    /// Returns the number of conversions the peripheral *reported*.  This
    /// may exceed `buf.len()`, in which case only `buf.len()` codes were
    /// copied and the caller treats it as an overrun.
    fn read_samples(&mut self, buf: &mut [u16]) -> usize;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Logical output lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Horn,
    ShiftUp,
    ShiftDown,
    /// First debug LED.
    DebugA,
    /// Second debug LED.
    DebugB,
    /// `true` routes the horn wire around the controller.
    BypassRelay,
}

/// Write-side port.  `active` is the logical state; adapters apply the
/// configured polarity.
pub trait DigitalOutput {
    fn set(&mut self, signal: Signal, active: bool);
}

// ───────────────────────────────────────────────────────────────
// Safety reset port (driven adapter: domain → watchdog)
// ───────────────────────────────────────────────────────────────

/// Hardware watchdog used only by the fault path.
pub trait SafetyReset {
    /// Load a countdown of `timeout_ms`.
    fn arm(&mut self, timeout_ms: u32);

    /// Start counting.  Nothing feeds it afterwards.
    fn start(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// Main-loop side notifications.  Never called from interrupt context.
pub trait EventSink {
    fn emit(&mut self, event: &ShifterEvent);
}
