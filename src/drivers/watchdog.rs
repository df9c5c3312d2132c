//! Task Watchdog Timer (TWDT) driver, used as the fault-path reset.
//!
//! Nothing feeds it.  `arm` loads the countdown, `start` subscribes the
//! calling task; once that task stops yielding the TWDT panics and the
//! device reboots.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

use crate::app::ports::SafetyReset;

#[derive(Debug, Default)]
pub struct TaskWatchdog {
    armed_ms: Option<u32>,
    started: bool,
}

impl TaskWatchdog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn armed_ms(&self) -> Option<u32> {
        self.armed_ms
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl SafetyReset for TaskWatchdog {
    fn arm(&mut self, timeout_ms: u32) {
        self.armed_ms = Some(timeout_ms);

        #[cfg(target_os = "espidf")]
        {
            let cfg = esp_task_wdt_config_t {
                timeout_ms,
                idle_core_mask: 0,
                trigger_panic: true,
            };
            // SAFETY: plain FFI call with a stack-owned config.
            let ret = unsafe { esp_task_wdt_reconfigure(&cfg) };
            if ret != ESP_OK as i32 {
                log::warn!("Watchdog: reconfigure returned {} (may already be configured)", ret);
            }
        }

        info!("Watchdog: armed ({} ms, panic on trigger)", timeout_ms);
    }

    fn start(&mut self) {
        self.started = true;

        #[cfg(target_os = "espidf")]
        {
            // SAFETY: null subscribes the calling task.
            let ret = unsafe { esp_task_wdt_add(core::ptr::null_mut()) };
            if ret != ESP_OK as i32 {
                log::warn!("Watchdog: failed to subscribe ({})", ret);
            }
        }

        #[cfg(not(target_os = "espidf"))]
        log::info!("Watchdog(sim): started, reset would follow");
    }
}
