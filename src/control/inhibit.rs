//! Inhibit countdown shared between the control, button and in-use tasks.
//!
//! While the countdown is non-zero the pump is held off, whatever the
//! temperature or run timer ask for.  Writers overwrite (a later press
//! replaces an earlier one), the one-second task decrements, and the
//! control task only reads.

use core::sync::atomic::{AtomicU32, Ordering};

use log::info;

use crate::config::PumpConfig;

/// Button gesture recognised by the button driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressKind {
    Single,
    Double,
    Long,
}

impl PressKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Long => "long",
        }
    }
}

/// Inhibit duration configured for each gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressTiers {
    pub single_secs: u32,
    pub double_secs: u32,
    pub long_secs: u32,
}

impl PressTiers {
    pub fn from_config(config: &PumpConfig) -> Self {
        Self {
            single_secs: config.short_press_inhibit_secs,
            double_secs: config.double_press_inhibit_secs,
            long_secs: config.long_press_inhibit_secs,
        }
    }

    pub fn secs_for(&self, kind: PressKind) -> u32 {
        match kind {
            PressKind::Single => self.single_secs,
            PressKind::Double => self.double_secs,
            PressKind::Long => self.long_secs,
        }
    }
}

impl Default for PressTiers {
    fn default() -> Self {
        Self::from_config(&PumpConfig::default())
    }
}

pub struct InhibitManager {
    remaining: AtomicU32,
}

impl InhibitManager {
    pub const fn new() -> Self {
        Self {
            remaining: AtomicU32::new(0),
        }
    }

    /// Overwrite the countdown.  Returns the value it replaced.
    pub fn set(&self, secs: u32) -> u32 {
        self.remaining.swap(secs, Ordering::AcqRel)
    }

    /// Apply a button gesture.  The new duration replaces any running one,
    /// so a long press after a single press leaves only the short hold.
    pub fn apply_press(&self, kind: PressKind, tiers: &PressTiers) -> u32 {
        let secs = tiers.secs_for(kind);
        self.set(secs);
        info!("Inhibit: {} press, pump held off for {}s", kind.name(), secs);
        secs
    }

    /// One-second decrement.  Saturates at zero; returns the new value.
    pub fn tick_second(&self) -> u32 {
        match self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |v| v.checked_sub(1))
        {
            Ok(prev) => prev - 1,
            Err(_) => 0,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn is_active(&self) -> bool {
        self.remaining() > 0
    }

    /// Remaining time rounded up to the next whole beat, for status lines.
    pub fn display_secs(&self, beat_secs: u32) -> u32 {
        let beat = beat_secs.max(1);
        (self.remaining() / beat + 1) * beat
    }
}

impl Default for InhibitManager {
    fn default() -> Self {
        Self::new()
    }
}
