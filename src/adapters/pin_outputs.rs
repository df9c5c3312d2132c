//! GPIO output adapter.
//!
//! Maps logical [`Signal`]s onto `embedded-hal` output pins, applying the
//! configured [`OutputPolarity`].  Optional lines (debug LEDs, bypass relay)
//! that were not wired up are silently ignored.

use embedded_hal::digital::{Error as _, OutputPin};
use log::{trace, warn};

use crate::app::ports::{DigitalOutput, Signal};
use crate::config::{OutputPolarity, Polarity};

pub struct PinOutputs<P> {
    horn: P,
    shift_up: P,
    shift_down: P,
    debug: Option<(P, P)>,
    bypass: Option<P>,
    polarity: OutputPolarity,
}

impl<P: OutputPin> PinOutputs<P> {
    pub fn new(horn: P, shift_up: P, shift_down: P, polarity: OutputPolarity) -> Self {
        Self {
            horn,
            shift_up,
            shift_down,
            debug: None,
            bypass: None,
            polarity,
        }
    }

    /// Attach the two debug indicator LEDs.
    #[must_use]
    pub fn with_debug(mut self, a: P, b: P) -> Self {
        self.debug = Some((a, b));
        self
    }

    /// Attach the horn-wire bypass relay.
    #[must_use]
    pub fn with_bypass(mut self, relay: P) -> Self {
        self.bypass = Some(relay);
        self
    }

    fn line(&mut self, signal: Signal) -> Option<(&mut P, Polarity)> {
        let polarity = self.polarity;
        match signal {
            Signal::Horn => Some((&mut self.horn, polarity.horn)),
            Signal::ShiftUp => Some((&mut self.shift_up, polarity.shift_up)),
            Signal::ShiftDown => Some((&mut self.shift_down, polarity.shift_down)),
            Signal::DebugA => self.debug.as_mut().map(|(a, _)| (a, polarity.debug)),
            Signal::DebugB => self.debug.as_mut().map(|(_, b)| (b, polarity.debug)),
            Signal::BypassRelay => self.bypass.as_mut().map(|r| (r, polarity.bypass_relay)),
        }
    }
}

impl<P: OutputPin> DigitalOutput for PinOutputs<P> {
    fn set(&mut self, signal: Signal, active: bool) {
        let Some((pin, polarity)) = self.line(signal) else {
            trace!("pin_outputs: {:?} not wired", signal);
            return;
        };
        let result = if polarity.pin_level(active) {
            pin.set_high()
        } else {
            pin.set_low()
        };
        if let Err(e) = result {
            warn!("pin_outputs: {:?} write failed ({:?})", signal, e.kind());
        }
    }
}
