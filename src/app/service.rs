//! Handlers, one per execution context.
//!
//! ```text
//!  AdcSource ──▶ ┌───────────────┐        ┌───────────────┐ ──▶ DigitalOutput
//!                │ SampleHandler │──────▶ │ OutputService │
//!                │ fault·classify│ Shared │  pulses·horn  │ ──▶ EventSink
//!                │ track·relay   │ State  │  debug·bypass │
//!                └───────────────┘        └───────────────┘
//!                      ▲ sample ISR              ▲ main loop
//! ```
//!
//! [`SampleHandler`] runs on ADC completion.  [`OutputService`] runs in the
//! main loop and is the only place outputs are driven.  The timebase tick
//! lives in [`crate::timebase`].

use log::{info, trace, warn};

use crate::app::commands::{Channel, Command};
use crate::app::events::ShifterEvent;
use crate::app::ports::{AdcSource, DigitalOutput, EventSink, Signal};
use crate::config::{ConversionTrigger, ShifterConfig, ThresholdTable};
use crate::debounce::Tracker;
use crate::error::HardwareFault;
use crate::relay::CommandRelay;
use crate::safety::FaultMonitor;
use crate::shared::SharedState;
use crate::signal::burst::{self, MAX_BURST};
use crate::signal::{SignalClass, classify};

// ───────────────────────────────────────────────────────────────
// Sampling context
// ───────────────────────────────────────────────────────────────

/// What one processed burst amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstOutcome {
    pub average: u16,
    pub class: SignalClass,
    /// Command relayed for this burst, if any.
    pub command: Option<Command>,
}

/// ADC completion handler: fault check → average → classify → track → relay.
pub struct SampleHandler<'a> {
    shared: &'a SharedState,
    thresholds: ThresholdTable,
    tracker: Tracker<'a>,
    relay: CommandRelay<'a>,
    monitor: FaultMonitor<'a>,
    capacity: usize,
    passes: u8,
    trigger: ConversionTrigger,
    buffer: [u16; MAX_BURST],
}

impl<'a> SampleHandler<'a> {
    pub fn new(shared: &'a SharedState, config: &ShifterConfig) -> Self {
        Self {
            shared,
            thresholds: config.thresholds,
            tracker: Tracker::new(shared, config),
            relay: CommandRelay::new(shared),
            monitor: FaultMonitor::new(shared, config),
            capacity: config.adc_buffer_capacity.min(MAX_BURST),
            passes: config.observations_per_sample,
            trigger: config.conversion_trigger,
            buffer: [0; MAX_BURST],
        }
    }

    /// Process one finished burst.
    ///
    /// `Ok(None)` means the burst was empty.  `Err` means a hardware fault is
    /// latched; the caller must enter [`crate::safety::shutdown`].  Once a
    /// fault is latched every later call fails with it, without reading the
    /// ADC.
    pub fn on_conversion_complete(
        &mut self,
        adc: &mut impl AdcSource,
    ) -> Result<Option<BurstOutcome>, HardwareFault> {
        if let Some(fault) = self.monitor.tripped() {
            return Err(fault);
        }

        let reported = adc.read_samples(&mut self.buffer[..self.capacity]);
        adc.reset_buffer();
        self.monitor.check_burst(reported)?;

        let outcome = match burst::average(&self.buffer[..reported]) {
            Some(mean) => {
                let average = self.monitor.check_average(mean)?;
                Some(self.interpret(average))
            }
            None => {
                trace!("sampler: empty burst skipped");
                None
            }
        };

        self.rearm(adc);
        Ok(outcome)
    }

    /// Fault monitor, for the shutdown path.
    pub fn monitor(&self) -> &FaultMonitor<'a> {
        &self.monitor
    }

    fn interpret(&mut self, average: u16) -> BurstOutcome {
        let class = classify(average, &self.thresholds);
        let mut command = None;
        for _ in 0..self.passes {
            if let Some(cmd) = self.tracker.observe(class) {
                self.relay.apply(cmd);
                command = Some(cmd);
            }
        }
        BurstOutcome {
            average,
            class,
            command,
        }
    }

    fn rearm(&self, adc: &mut impl AdcSource) {
        match self.trigger {
            ConversionTrigger::SelfRearming => adc.start_conversion(),
            ConversionTrigger::SampleTimer => self.shared.conversion_done().raise(),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Main-loop context
// ───────────────────────────────────────────────────────────────

const SIGNAL_COUNT: usize = 6;

const fn slot(signal: Signal) -> usize {
    match signal {
        Signal::Horn => 0,
        Signal::ShiftUp => 1,
        Signal::ShiftDown => 2,
        Signal::DebugA => 3,
        Signal::DebugB => 4,
        Signal::BypassRelay => 5,
    }
}

/// Debug LED pattern: horn lights both, up lights A, down lights B.
const fn debug_mirror(horn: bool, up: bool, down: bool) -> (bool, bool) {
    if horn {
        (true, true)
    } else if up {
        (true, false)
    } else if down {
        (false, true)
    } else {
        (false, false)
    }
}

/// Drains the output hand-off flags into the output port.
pub struct OutputService<'a> {
    shared: &'a SharedState,
    debug_indicator: bool,
    bypass_relay: bool,
    /// Last logical level written per signal; `None` until first write.
    driven: [Option<bool>; SIGNAL_COUNT],
    fault_reported: bool,
}

impl<'a> OutputService<'a> {
    pub fn new(shared: &'a SharedState, config: &ShifterConfig) -> Self {
        Self {
            shared,
            debug_indicator: config.debug_indicator,
            bypass_relay: config.bypass_relay,
            driven: [None; SIGNAL_COUNT],
            fault_reported: false,
        }
    }

    /// Power-on state: everything inactive, horn wire bypassed.
    pub fn power_on(&mut self, out: &mut impl DigitalOutput, sink: &mut impl EventSink) {
        self.force_safe(out, sink);
    }

    /// Called once the startup gate is open: horn off, then take the horn
    /// wire over from the bypass relay.
    pub fn start(&mut self, out: &mut impl DigitalOutput, sink: &mut impl EventSink) {
        self.drive(out, sink, Signal::Horn, false);
        if self.bypass_relay {
            self.drive(out, sink, Signal::BypassRelay, false);
        }
        info!("outputs: controller in charge of horn wire");
        sink.emit(&ShifterEvent::StartupComplete);
    }

    /// One main-loop iteration.
    pub fn poll(&mut self, out: &mut impl DigitalOutput, sink: &mut impl EventSink) {
        if let Some(fault) = self.shared.fault() {
            if !self.fault_reported {
                self.fault_reported = true;
                warn!("outputs: {} latched, forcing safe state", fault);
                self.force_safe(out, sink);
                sink.emit(&ShifterEvent::FaultLatched(fault));
            }
            return;
        }

        let up = self.pulse_level(Channel::ShiftUp);
        let down = self.pulse_level(Channel::ShiftDown);
        let horn = self.shared.outputs.horn_active();

        self.drive(out, sink, Signal::ShiftUp, up);
        self.drive(out, sink, Signal::ShiftDown, down);
        self.drive(out, sink, Signal::Horn, horn);

        if self.debug_indicator {
            let (a, b) = debug_mirror(horn, up, down);
            self.drive(out, sink, Signal::DebugA, a);
            self.drive(out, sink, Signal::DebugB, b);
        }
    }

    /// Last level written to `signal`.
    pub fn level(&self, signal: Signal) -> Option<bool> {
        self.driven[slot(signal)]
    }

    /// A paddle output is high while its pulse is pending and its hold
    /// window runs.  Once the hold has ended the pending pulse is retired.
    fn pulse_level(&self, channel: Channel) -> bool {
        let (Some(pending), Some(hold)) =
            (self.shared.outputs.pulse(channel), self.shared.hold(channel))
        else {
            return false;
        };
        let Some(seq) = pending.pending() else {
            return false;
        };
        if hold.is_set() {
            true
        } else {
            pending.acknowledge(seq);
            false
        }
    }

    fn force_safe(&mut self, out: &mut impl DigitalOutput, sink: &mut impl EventSink) {
        for signal in [Signal::ShiftUp, Signal::ShiftDown, Signal::Horn] {
            self.drive(out, sink, signal, false);
        }
        if self.debug_indicator {
            self.drive(out, sink, Signal::DebugA, false);
            self.drive(out, sink, Signal::DebugB, false);
        }
        if self.bypass_relay {
            self.drive(out, sink, Signal::BypassRelay, true);
        }
    }

    fn drive(
        &mut self,
        out: &mut impl DigitalOutput,
        sink: &mut impl EventSink,
        signal: Signal,
        active: bool,
    ) {
        let last = &mut self.driven[slot(signal)];
        if *last == Some(active) {
            return;
        }
        *last = Some(active);
        out.set(signal, active);
        sink.emit(&ShifterEvent::OutputChanged { signal, active });
    }
}
