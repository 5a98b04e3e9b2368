//! In-use bridge.
//!
//! When the user switches the accessory off (`active = false`) the pump
//! switch does not stay off: in-use drops, the accessory settles, then
//! in-use and active come back together and a cooldown inhibit is applied
//! so the user's pause still holds the pump for a while.
//!
//! ```text
//!   IDLE ──(active == false)──▶ SETTLING ──(settle elapsed)──▶ IDLE
//!          in_use := false               inhibit := stop_for
//!                                        in_use := active := true
//! ```
//!
//! Ticked once per second by the in-use task; never blocks.

use log::info;

use crate::config::PumpConfig;
use crate::control::inhibit::InhibitManager;

use super::accessory::AccessoryState;
use super::events::AppEvent;
use super::ports::{AccessoryPort, EventSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InUsePhase {
    Idle,
    Settling { remaining_secs: u32 },
}

pub struct InUseBridge {
    phase: InUsePhase,
    settle_secs: u32,
    stop_for_secs: u32,
}

impl InUseBridge {
    pub fn new(settle_secs: u32, stop_for_secs: u32) -> Self {
        Self {
            phase: InUsePhase::Idle,
            settle_secs,
            stop_for_secs,
        }
    }

    pub fn from_config(config: &PumpConfig) -> Self {
        Self::new(config.settle_secs, config.stop_for_secs)
    }

    /// Advance one second.
    pub fn tick(
        &mut self,
        accessory: &AccessoryState,
        inhibit: &InhibitManager,
        notifier: &mut impl AccessoryPort,
        sink: &mut impl EventSink,
    ) -> InUsePhase {
        self.phase = match self.phase {
            InUsePhase::Idle if !accessory.active() => {
                accessory.set_in_use(false);
                notifier.notify_in_use(false);
                sink.emit(&AppEvent::InUseDropped);
                info!("InUse: paused, restoring in {}s", self.settle_secs);
                InUsePhase::Settling {
                    remaining_secs: self.settle_secs,
                }
            }
            InUsePhase::Settling { remaining_secs } => InUsePhase::Settling {
                remaining_secs: remaining_secs.saturating_sub(1),
            },
            InUsePhase::Idle => InUsePhase::Idle,
        };

        if self.phase == (InUsePhase::Settling { remaining_secs: 0 }) {
            self.restore(accessory, inhibit, notifier, sink);
        }
        self.phase
    }

    fn restore(
        &mut self,
        accessory: &AccessoryState,
        inhibit: &InhibitManager,
        notifier: &mut impl AccessoryPort,
        sink: &mut impl EventSink,
    ) {
        inhibit.set(self.stop_for_secs);
        accessory.set_in_use(true);
        accessory.set_active(true);
        notifier.notify_in_use(true);
        notifier.notify_active(true);
        sink.emit(&AppEvent::InUseRestored {
            cooldown_secs: self.stop_for_secs,
        });
        info!("InUse: restored, pump held off for {}s", self.stop_for_secs);
        self.phase = InUsePhase::Idle;
    }

    pub fn phase(&self) -> InUsePhase {
        self.phase
    }
}
