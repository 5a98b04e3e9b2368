//! Task Watchdog Timer (TWDT) driver.
//!
//! Each long-running task subscribes itself and must [`feed`](Watchdog::feed)
//! at least once per timeout.  A wedged control or in-use task then
//! resets the device instead of leaving the pump in a stale state.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

pub struct Watchdog {
    label: &'static str,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Reconfigure the TWDT to `timeout_ms`.  Call once during bring-up.
    #[cfg(target_os = "espidf")]
    pub fn configure(timeout_ms: u32) {
        let cfg = esp_task_wdt_config_t {
            timeout_ms,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        let ret = unsafe { esp_task_wdt_reconfigure(&cfg) };
        if ret == ESP_OK {
            info!("Watchdog: {} ms timeout, panic on trigger", timeout_ms);
        } else {
            warn!("Watchdog: reconfigure returned {} (may already be configured)", ret);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn configure(timeout_ms: u32) {
        info!("Watchdog(sim): {} ms timeout, no-op", timeout_ms);
    }

    /// Subscribe the calling task.
    #[cfg(target_os = "espidf")]
    pub fn subscribe_current(label: &'static str) -> Self {
        let ret = unsafe { esp_task_wdt_add(core::ptr::null_mut()) };
        let subscribed = ret == ESP_OK;
        if subscribed {
            info!("Watchdog: '{}' subscribed", label);
        } else {
            warn!("Watchdog: '{}' failed to subscribe ({})", label, ret);
        }
        Self { label, subscribed }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn subscribe_current(label: &'static str) -> Self {
        info!("Watchdog(sim): '{}' subscribed", label);
        Self { label }
    }

    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}
