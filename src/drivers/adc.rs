//! Horn-wire ADC driver.
//!
//! The ESP32-S3 oneshot driver converts synchronously, so a "burst" is
//! `burst_len` back-to-back reads taken inside [`AdcSource::start_conversion`].
//! The burst is then immediately ready; [`EspAdc::take_ready`] is the
//! completion notification the sample-timer callback polls.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 through the oneshot handle from
//! [`hw_init::init_adc`](super::hw_init::init_adc).
//! On host/test: every conversion returns the level set with
//! [`EspAdc::inject`].

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use heapless::Vec;
use log::debug;

use super::hw_init::AdcHandle;
use crate::app::ports::AdcSource;
use crate::signal::burst::MAX_BURST;

pub struct EspAdc {
    handle: AdcHandle,
    burst_len: usize,
    burst: Vec<u16, MAX_BURST>,
    ready: bool,
    failed_reads: u32,
    #[cfg(not(target_os = "espidf"))]
    level: u16,
}

// SAFETY: after init the oneshot handle is only used from the esp_timer task
// that owns this value.
#[cfg(target_os = "espidf")]
unsafe impl Send for EspAdc {}

impl EspAdc {
    pub fn new(handle: AdcHandle, burst_len: usize) -> Self {
        Self {
            handle,
            burst_len: burst_len.min(MAX_BURST),
            burst: Vec::new(),
            ready: false,
            failed_reads: 0,
            #[cfg(not(target_os = "espidf"))]
            level: 0,
        }
    }

    /// `true` once per finished burst.
    pub fn take_ready(&mut self) -> bool {
        core::mem::take(&mut self.ready)
    }

    /// Conversions that returned an error and were left out of their burst.
    pub fn failed_reads(&self) -> u32 {
        self.failed_reads
    }

    /// Simulated horn-wire level for subsequent conversions.
    #[cfg(not(target_os = "espidf"))]
    pub fn inject(&mut self, level: u16) {
        self.level = level;
    }

    #[cfg(target_os = "espidf")]
    fn convert(&mut self) -> Option<u16> {
        let mut raw: i32 = 0;
        // SAFETY: handle and channel were configured by init_adc(); only
        // this driver touches them.
        let ret = unsafe { adc_oneshot_read(self.handle.unit, self.handle.channel, &mut raw) };
        if ret != ESP_OK as i32 {
            return None;
        }
        Some(raw.max(0) as u16)
    }

    #[cfg(not(target_os = "espidf"))]
    fn convert(&mut self) -> Option<u16> {
        log::trace!("adc(sim): CH{} -> {:#05x}", self.handle.channel, self.level);
        Some(self.level)
    }
}

impl AdcSource for EspAdc {
    fn start_conversion(&mut self) {
        self.burst.clear();
        for _ in 0..self.burst_len {
            match self.convert() {
                Some(code) => {
                    if self.burst.push(code).is_err() {
                        break;
                    }
                }
                None => self.failed_reads = self.failed_reads.wrapping_add(1),
            }
        }
        self.ready = true;
    }

    fn reset_buffer(&mut self) {
        self.burst.clear();
        self.ready = false;
    }

    fn read_samples(&mut self, buf: &mut [u16]) -> usize {
        let n = self.burst.len().min(buf.len());
        buf[..n].copy_from_slice(&self.burst[..n]);
        if self.burst.len() < self.burst_len {
            debug!("adc: short burst ({} of {})", self.burst.len(), self.burst_len);
        }
        self.burst.len()
    }
}
