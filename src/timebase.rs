//! Timebase coordinator.
//!
//! Two periodic notifications drive the shifter:
//!
//! - the **tick** (every `tick_period_ms`) calls [`Timebase::on_tick`],
//!   which owns every elapsed-time counter: the startup gate, the debounce
//!   lockouts and the paddle hold windows;
//! - the **sample timer** (every `sample_period_us`) calls
//!   [`ConversionPacer::on_sample_timer`], which starts the next ADC burst
//!   once the previous one has been processed.
//!
//! Durations are counted in whole ticks, `ms / tick_period_ms` rounded
//! down.  Latches are raised from the sampling side at any point inside a
//! tick period, so the tick that first sees a raise only starts the window;
//! counting begins with the next full period.  A window that has started
//! always runs to completion; nothing on the sampling side can cut it short.

use log::info;

use crate::app::commands::Channel;
use crate::app::ports::AdcSource;
use crate::config::{ConversionTrigger, ShifterConfig, Timing};
use crate::shared::{Latch, SharedState, StartupGate};

pub struct Timebase<'a> {
    shared: &'a SharedState,
    timing: Timing,
    startup_elapsed: u32,
    lockouts: [Window; 3],
    holds: [Window; 2],
}

/// Tick bookkeeping for one latch.
#[derive(Debug, Default, Clone, Copy)]
struct Window {
    /// The raise has been seen; the partial period before it is over.
    started: bool,
    elapsed: u32,
}

impl<'a> Timebase<'a> {
    pub fn new(shared: &'a SharedState, config: &ShifterConfig) -> Self {
        Self {
            shared,
            timing: Timing::from_config(config),
            startup_elapsed: 0,
            lockouts: [Window::default(); 3],
            holds: [Window::default(); 2],
        }
    }

    /// Advance every running window by one tick.
    pub fn on_tick(&mut self) {
        if !self.shared.startup.is_open() {
            self.startup_elapsed = self.startup_elapsed.saturating_add(1);
            if self.startup_elapsed >= self.timing.startup_ticks {
                self.shared.startup.open();
                info!("timebase: startup gate open after {} ticks", self.startup_elapsed);
            }
        }

        for channel in Channel::ALL {
            advance(
                self.shared.lockout(channel),
                &mut self.lockouts[channel.index()],
                self.timing.debounce_ticks(channel),
            );
        }

        for (slot, channel) in [Channel::ShiftUp, Channel::ShiftDown].into_iter().enumerate() {
            if let Some(hold) = self.shared.hold(channel) {
                advance(hold, &mut self.holds[slot], self.timing.active_ticks);
            }
        }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }
}

/// Count one tick against a raised latch; lower it after `limit` full
/// periods (at least one).
///
/// Only the raise seen at the top is retired: a raise that lands between
/// `pending` and `acknowledge` keeps the latch set and opens a new window.
fn advance(latch: &Latch, window: &mut Window, limit: u32) {
    let Some(seq) = latch.pending() else {
        *window = Window::default();
        return;
    };
    if !window.started {
        window.started = true;
        return;
    }
    window.elapsed = window.elapsed.saturating_add(1);
    if window.elapsed >= limit {
        *window = Window::default();
        latch.acknowledge(seq);
    }
}

/// Starts ADC bursts from the sample timer.
pub struct ConversionPacer<'a> {
    shared: &'a SharedState,
    trigger: ConversionTrigger,
}

impl<'a> ConversionPacer<'a> {
    pub fn new(shared: &'a SharedState, config: &ShifterConfig) -> Self {
        Self {
            shared,
            trigger: config.conversion_trigger,
        }
    }

    /// First burst, issued once by the start-up sequence.
    pub fn prime(&mut self, adc: &mut impl AdcSource) {
        adc.reset_buffer();
        adc.start_conversion();
    }

    /// Sample-timer notification.  Returns `true` if a burst was started.
    pub fn on_sample_timer(&mut self, adc: &mut impl AdcSource) -> bool {
        if self.trigger != ConversionTrigger::SampleTimer || self.shared.fault().is_some() {
            return false;
        }
        let done = self.shared.conversion_done();
        if !done.is_set() {
            return false;
        }
        done.lower();
        adc.start_conversion();
        true
    }
}

/// The one blocking wait: spin until the warm-up gate opens.
///
/// `idle` runs on every iteration.  On hardware it yields or sleeps while
/// the tick interrupt advances the gate; in tests it drives a fake clock.
pub fn block_until_open(gate: &StartupGate, mut idle: impl FnMut()) {
    while !gate.is_open() {
        idle();
    }
}
