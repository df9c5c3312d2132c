//! Fault monitor.
//!
//! Checks every ADC burst against the driver contract before anything is
//! classified:
//!
//! 1. the reported burst length must fit the configured buffer, and
//! 2. the burst average must not exceed the maximum valid ADC code.
//!
//! Either violation means the converter or its driver can no longer be
//! trusted.  There is no retry path.  The fault is latched in
//! [`SharedState`] (the sampling handler refuses all further bursts), the
//! watchdog is armed with a short countdown and started, and the caller
//! spins in [`halt`] until the watchdog resets the device.
//!
//! ## Fault lifecycle
//!
//! 1. `check_burst` / `check_average` detect the violation and latch it.
//! 2. The sampling context calls [`shutdown`], which arms and starts the
//!    watchdog through [`SafetyReset`] and never returns.
//! 3. Where the main loop can still run (task-based targets), the output
//!    service sees the latch and drives every output safe.

use log::error;

use crate::app::ports::SafetyReset;
use crate::config::ShifterConfig;
use crate::error::HardwareFault;
use crate::shared::SharedState;

pub struct FaultMonitor<'a> {
    shared: &'a SharedState,
    buffer_capacity: usize,
    max_value: u16,
    watchdog_timeout_ms: u32,
}

impl<'a> FaultMonitor<'a> {
    pub fn new(shared: &'a SharedState, config: &ShifterConfig) -> Self {
        Self {
            shared,
            buffer_capacity: config.adc_buffer_capacity,
            max_value: config.adc_max_value,
            watchdog_timeout_ms: config.watchdog_timeout_ms,
        }
    }

    /// Reject a burst whose reported length overruns the buffer.
    pub fn check_burst(&self, reported: usize) -> Result<(), HardwareFault> {
        if reported > self.buffer_capacity {
            error!(
                "SAFETY FAULT: ADC reported {} samples, buffer holds {}",
                reported, self.buffer_capacity
            );
            return Err(self.trip(HardwareFault::SampleOverrun));
        }
        Ok(())
    }

    /// Reject an average above the valid range; otherwise narrow it.
    pub fn check_average(&self, average: u32) -> Result<u16, HardwareFault> {
        if average > u32::from(self.max_value) {
            error!(
                "SAFETY FAULT: ADC average {:#06x} above maximum {:#06x}",
                average, self.max_value
            );
            return Err(self.trip(HardwareFault::ValueOutOfRange));
        }
        Ok(average as u16)
    }

    /// Latched fault, if any.
    pub fn tripped(&self) -> Option<HardwareFault> {
        self.shared.fault()
    }

    /// Arm and start the watchdog.  First half of [`shutdown`].
    pub fn begin_shutdown(&self, fault: HardwareFault, reset: &mut impl SafetyReset) {
        error!(
            "SAFETY SHUTDOWN: {}, watchdog reset in {} ms",
            fault, self.watchdog_timeout_ms
        );
        reset.arm(self.watchdog_timeout_ms);
        reset.start();
    }

    /// First fault wins; later ones are not recorded.
    fn trip(&self, fault: HardwareFault) -> HardwareFault {
        if self.shared.fault().is_none() {
            self.shared.latch_fault(fault);
        }
        fault
    }
}

/// Wait for the watchdog.
pub fn halt() -> ! {
    loop {
        core::hint::spin_loop();
    }
}

/// Full fault response: arm the watchdog, start it, never return.
pub fn shutdown(monitor: &FaultMonitor<'_>, fault: HardwareFault, reset: &mut impl SafetyReset) -> ! {
    monitor.begin_shutdown(fault, reset);
    halt()
}
