//! Log-based event sink adapter.
//!
//! Writes application events to the ESP-IDF logger (UART in
//! production).  The tick line keeps the classic console shape:
//! `R<return> - <supply> C => <0|1><status>`.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Console line for one control tick.
pub fn tick_line(supply_c: f32, return_c: f32, pump_on: bool, status: impl core::fmt::Display) -> String {
    format!(
        "R{:.3} - {:.3} C => {}{}",
        return_c,
        supply_c,
        u8::from(pump_on),
        status
    )
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Tick {
                supply_c,
                return_c,
                pump_on,
                status,
            } => info!("{}", tick_line(*supply_c, *return_c, *pump_on, status)),
            AppEvent::PumpSwitched { on } => {
                info!("PUMP  | {}", if *on { "on" } else { "off" });
            }
            AppEvent::StallReported(drop) => info!("STALL | return drop {:.1}", drop),
            AppEvent::PublishFailed { channel, error } => {
                warn!("TELEM | {} not sent: {}", channel.name(), error);
            }
            AppEvent::InUseDropped => info!("INUSE | 0 ... waiting ... 1"),
            AppEvent::InUseRestored { cooldown_secs } => {
                info!("INUSE | 1, inhibit {}s", cooldown_secs);
            }
        }
    }
}
