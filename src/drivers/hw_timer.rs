//! Periodic timers on ESP-IDF's esp_timer API.
//!
//! Two timers drive the shifter: the tick (timebase) and the sample timer
//! (ADC pacing and burst processing).  Both dispatch from the esp_timer
//! task, so their callbacks never run concurrently with each other; shared
//! state between them and the main loop goes through atomics only.
//!
//! On simulation targets nothing is scheduled; tests call the handlers
//! directly.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

use super::hw_init::HwInitError;

/// A running periodic timer.  Dropping it does not stop the callback;
/// timers live until reset.
pub struct PeriodicTimer {
    #[cfg(target_os = "espidf")]
    handle: esp_timer_handle_t,
    name: &'static core::ffi::CStr,
    period_us: u64,
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn trampoline<F: FnMut()>(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` is the leaked `F` registered in `PeriodicTimer::start`
    // and this timer is its only caller.
    let handler = unsafe { &mut *arg.cast::<F>() };
    handler();
}

impl PeriodicTimer {
    /// Call `handler` every `period_us` microseconds from the timer task.
    #[cfg(target_os = "espidf")]
    pub fn start<F>(
        name: &'static core::ffi::CStr,
        period_us: u64,
        handler: F,
    ) -> Result<Self, HwInitError>
    where
        F: FnMut() + Send + 'static,
    {
        let arg: *mut F = Box::leak(Box::new(handler));
        let args = esp_timer_create_args_t {
            callback: Some(trampoline::<F>),
            arg: arg.cast(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: name.as_ptr(),
            skip_unhandled_events: true,
        };
        let mut handle: esp_timer_handle_t = core::ptr::null_mut();
        // SAFETY: `args` outlives the call; `arg` is leaked and lives forever.
        let ret = unsafe { esp_timer_create(&args, &mut handle) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::TimerFailed(ret));
        }
        // SAFETY: `handle` was created just above.
        let ret = unsafe { esp_timer_start_periodic(handle, period_us) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::TimerFailed(ret));
        }
        info!("hw_timer: {:?} every {} us", name, period_us);
        Ok(Self { handle, name, period_us })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn start<F>(
        name: &'static core::ffi::CStr,
        period_us: u64,
        _handler: F,
    ) -> Result<Self, HwInitError>
    where
        F: FnMut() + Send + 'static,
    {
        info!("hw_timer(sim): {:?} every {} us not scheduled", name, period_us);
        Ok(Self { name, period_us })
    }

    /// Stop the callback.
    pub fn stop(&self) {
        #[cfg(target_os = "espidf")]
        // SAFETY: handle is valid for the lifetime of `self`.
        unsafe {
            esp_timer_stop(self.handle);
        }
        info!("hw_timer: {:?} stopped", self.name);
    }

    pub fn period_us(&self) -> u64 {
        self.period_us
    }
}
