//! Externally observed accessory characteristics.
//!
//! The smart-home layer sees three values: `active` (writable by the
//! user), `in_use` (written only by the in-use bridge) and the current
//! temperature.  The flags live in atomics so the accessory server, the
//! in-use task and the control task can share them without a lock.

use core::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};

use crate::error::CharacteristicError;

/// Wire shape of a characteristic value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacteristicValue {
    Bool(bool),
    Uint8(u8),
    Float(f32),
}

pub struct AccessoryState {
    active: AtomicBool,
    in_use: AtomicBool,
}

impl AccessoryState {
    /// Both flags start set: the pump switch is active and in use at boot.
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(true),
            in_use: AtomicBool::new(true),
        }
    }

    pub fn active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }

    pub fn in_use(&self) -> bool {
        self.in_use.load(Ordering::Acquire)
    }

    pub fn set_in_use(&self, in_use: bool) {
        self.in_use.store(in_use, Ordering::Release);
    }

    /// Getter for the `active` characteristic.
    pub fn read_active(&self) -> CharacteristicValue {
        CharacteristicValue::Uint8(u8::from(self.active()))
    }

    /// Setter for the `active` characteristic.  Only `Uint8` is accepted;
    /// anything else is rejected and the flag keeps its value.
    pub fn write_active(&self, value: CharacteristicValue) -> Result<(), CharacteristicError> {
        match value {
            CharacteristicValue::Uint8(v) => {
                self.set_active(v != 0);
                Ok(())
            }
            other => {
                warn!("Accessory: invalid active-value format {:?}", other);
                Err(CharacteristicError::InvalidFormat)
            }
        }
    }

    /// `in_use` is driven by the in-use bridge only.
    pub fn write_in_use(&self, _value: CharacteristicValue) -> Result<(), CharacteristicError> {
        Err(CharacteristicError::ReadOnly)
    }

    /// Identify request from the controller app.
    pub fn identify(&self) {
        info!("Accessory: identify");
    }
}

impl Default for AccessoryState {
    fn default() -> Self {
        Self::new()
    }
}

/// Current-temperature characteristic, rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureCharacteristic {
    value: f32,
}

impl TemperatureCharacteristic {
    pub const INITIAL: f32 = 1.0;

    pub fn new() -> Self {
        Self {
            value: Self::INITIAL,
        }
    }

    /// Store `celsius` rounded to one decimal.  Returns the value to
    /// notify, or `None` when the rounded value did not change.
    pub fn update(&mut self, celsius: f32) -> Option<f32> {
        let rounded = (celsius * 10.0).round() / 10.0;
        if rounded == self.value {
            return None;
        }
        self.value = rounded;
        Some(rounded)
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

impl Default for TemperatureCharacteristic {
    fn default() -> Self {
        Self::new()
    }
}
