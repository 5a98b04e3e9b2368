//! Temperature inputs: the per-tick [`TemperatureSnapshot`] and the
//! [`ProbeBank`](probe_bank::ProbeBank) that the one-wire driver fills.
//!
//! The control core never sees probe addresses: readings are keyed by
//! [`SensorRole`] only, and a role without a valid reading carries
//! [`UNKNOWN_CELSIUS`].

pub mod probe_bank;

/// Reading used for a role whose probe failed or is absent.
pub const UNKNOWN_CELSIUS: f32 = 99.99;

/// Logical position of a probe in the circulation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SensorRole {
    /// Water leaving the heater towards the taps.
    Supply = 0,
    /// Water coming back from the loop.
    Return = 1,
}

impl SensorRole {
    pub const COUNT: usize = 2;
    pub const ALL: [SensorRole; Self::COUNT] = [Self::Supply, Self::Return];

    pub fn name(self) -> &'static str {
        match self {
            Self::Supply => "supply",
            Self::Return => "return",
        }
    }
}

/// Both readings taken for one control tick.  Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSnapshot {
    readings: [f32; SensorRole::COUNT],
}

impl TemperatureSnapshot {
    /// Build a snapshot; NaN or infinite readings become [`UNKNOWN_CELSIUS`].
    pub fn new(supply: f32, return_: f32) -> Self {
        Self {
            readings: [sanitize(supply), sanitize(return_)],
        }
    }

    /// Snapshot with every role unknown.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_CELSIUS, UNKNOWN_CELSIUS)
    }

    pub fn get(&self, role: SensorRole) -> f32 {
        self.readings[role as usize]
    }

    pub fn supply(&self) -> f32 {
        self.get(SensorRole::Supply)
    }

    pub fn return_line(&self) -> f32 {
        self.get(SensorRole::Return)
    }

    /// Whether `role` carries a real reading this tick.
    pub fn is_known(&self, role: SensorRole) -> bool {
        !is_unknown(self.get(role))
    }
}

impl Default for TemperatureSnapshot {
    fn default() -> Self {
        Self::unknown()
    }
}

/// True for the unknown-reading sentinel.
pub fn is_unknown(celsius: f32) -> bool {
    (celsius - UNKNOWN_CELSIUS).abs() < 1e-3
}

fn sanitize(celsius: f32) -> f32 {
    if celsius.is_finite() {
        celsius
    } else {
        UNKNOWN_CELSIUS
    }
}
