//! Application core: pure domain logic, zero I/O.
//!
//! The [`service::PumpController`] turns temperature snapshots into a pump
//! decision; the [`in_use::InUseBridge`] reconciles the externally toggled
//! `active` flag.  All interaction with hardware happens through the
//! **port traits** in [`ports`], keeping this layer testable without
//! real peripherals.

pub mod accessory;
pub mod events;
pub mod in_use;
pub mod ports;
pub mod service;

use accessory::AccessoryState;
use crate::control::inhibit::InhibitManager;

/// State shared by the control, in-use, button and accessory tasks.
///
/// Every field is single-writer or overwrite-only; readers tolerate one
/// tick of staleness.
pub struct SharedState {
    pub inhibit: InhibitManager,
    pub accessory: AccessoryState,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            inhibit: InhibitManager::new(),
            accessory: AccessoryState::new(),
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
