//! Role-keyed store of the latest probe readings.
//!
//! The one-wire driver (outside this crate) scans the bus, converts, and
//! calls [`ProbeBank::record`] with each probe's ROM code.  Bindings from
//! ROM code to [`SensorRole`] are explicit and come from configuration,
//! so nothing depends on how a particular probe batch encodes its address.
//!
//! Readings are stored as `f32` bits in atomics: the driver task writes,
//! the control task reads once per tick.  A reading older than
//! `max_age_reads` snapshots is treated as unknown.

use core::sync::atomic::{AtomicU32, Ordering};

use heapless::Vec;
use log::warn;

use super::{SensorRole, TemperatureSnapshot, UNKNOWN_CELSIUS};
use crate::error::SensorError;

/// Maximum number of ROM-code bindings.
const MAX_BINDINGS: usize = 4;

/// Snapshots a reading survives without being refreshed.
const DEFAULT_MAX_AGE: u32 = 3;

/// Binding of one probe ROM code to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeBinding {
    pub rom: u64,
    pub role: SensorRole,
}

struct Slot {
    bits: AtomicU32,
    /// Snapshots taken since the last `record` for this role.
    age: AtomicU32,
}

impl Slot {
    const fn new() -> Self {
        Self {
            bits: AtomicU32::new(UNKNOWN_BITS),
            age: AtomicU32::new(u32::MAX),
        }
    }
}

const UNKNOWN_BITS: u32 = 0x42C7_FAE1; // 99.99_f32

pub struct ProbeBank {
    bindings: Vec<ProbeBinding, MAX_BINDINGS>,
    slots: [Slot; SensorRole::COUNT],
    max_age_reads: u32,
}

impl ProbeBank {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            slots: [Slot::new(), Slot::new()],
            max_age_reads: DEFAULT_MAX_AGE,
        }
    }

    /// Bank with the supply/return ROM codes from configuration.
    pub fn with_roles(supply_rom: u64, return_rom: u64) -> Self {
        let mut bank = Self::new();
        // Two bindings always fit.
        let _ = bank.bind(supply_rom, SensorRole::Supply);
        let _ = bank.bind(return_rom, SensorRole::Return);
        bank
    }

    /// Bind a ROM code to a role, replacing an existing binding for the code.
    pub fn bind(&mut self, rom: u64, role: SensorRole) -> Result<(), SensorError> {
        if let Some(b) = self.bindings.iter_mut().find(|b| b.rom == rom) {
            b.role = role;
            return Ok(());
        }
        self.bindings
            .push(ProbeBinding { rom, role })
            .map_err(|_| SensorError::BankFull)
    }

    pub fn role_of(&self, rom: u64) -> Option<SensorRole> {
        self.bindings.iter().find(|b| b.rom == rom).map(|b| b.role)
    }

    /// Store a conversion result.  NaN marks a failed conversion.
    pub fn record(&self, rom: u64, celsius: f32) -> Result<SensorRole, SensorError> {
        let role = self.role_of(rom).ok_or(SensorError::UnknownProbe(rom))?;
        let slot = &self.slots[role as usize];
        let value = if celsius.is_finite() {
            celsius
        } else {
            UNKNOWN_CELSIUS
        };
        slot.bits.store(value.to_bits(), Ordering::Release);
        slot.age.store(0, Ordering::Release);
        Ok(role)
    }

    /// Record a whole bus scan, logging (not failing on) unbound probes.
    pub fn record_scan(&self, readings: &[(u64, f32)]) {
        for &(rom, celsius) in readings {
            if let Err(e) = self.record(rom, celsius) {
                warn!("ProbeBank: {}", e);
            }
        }
    }

    /// Take the snapshot for this tick.  Ages every slot by one read.
    pub fn snapshot(&self) -> TemperatureSnapshot {
        let read = |role: SensorRole| {
            let slot = &self.slots[role as usize];
            // Saturates at the ceiling; a concurrent `record` is never undone.
            let age = slot
                .age
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |a| Some(a.saturating_add(1)))
                .unwrap_or_else(|a| a);
            if age >= self.max_age_reads {
                return UNKNOWN_CELSIUS;
            }
            f32::from_bits(slot.bits.load(Ordering::Acquire))
        };
        TemperatureSnapshot::new(read(SensorRole::Supply), read(SensorRole::Return))
    }
}

impl Default for ProbeBank {
    fn default() -> Self {
        Self::new()
    }
}
