//! Unified error types for the PumpSwitch firmware.
//!
//! A single `Error` enum that every subsystem converts into.  All variants
//! are `Copy` so they can be handed across task boundaries and logged
//! without allocation.  The control tick itself never fails; these errors
//! surface only at the edges (telemetry, accessory writes, configuration).

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A temperature probe could not be resolved to a role.
    Sensor(SensorError),
    /// A telemetry value could not be handed to the publisher.
    Publish(PublishError),
    /// An external write to an accessory characteristic was rejected.
    Characteristic(CharacteristicError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
    /// Peripheral or task bring-up failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Publish(e) => write!(f, "publish: {e}"),
            Self::Characteristic(e) => write!(f, "characteristic: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// A probe reported a reading but its ROM code is not bound to a role.
    UnknownProbe(u64),
    /// The probe bank has no free slot for another binding.
    BankFull,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownProbe(rom) => write!(f, "unbound probe {rom:016x}"),
            Self::BankFull => write!(f, "probe bank full"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Publish errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
    /// The outbound queue is full; the value was dropped.
    QueueFull,
    /// The MQTT client refused the message.
    ClientRejected(i32),
    /// The broker connection is not up.
    NotConnected,
    /// The value could not be encoded as a payload.
    Encoding,
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull => write!(f, "telemetry queue full"),
            Self::ClientRejected(rc) => write!(f, "MQTT client rejected message (rc={rc})"),
            Self::NotConnected => write!(f, "MQTT not connected"),
            Self::Encoding => write!(f, "payload encoding failed"),
        }
    }
}

impl From<PublishError> for Error {
    fn from(e: PublishError) -> Self {
        Self::Publish(e)
    }
}

// ---------------------------------------------------------------------------
// Characteristic errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacteristicError {
    /// The written value does not have the characteristic's encoding.
    InvalidFormat,
    /// The characteristic is read-only.
    ReadOnly,
}

impl fmt::Display for CharacteristicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat => write!(f, "invalid value format"),
            Self::ReadOnly => write!(f, "characteristic is read-only"),
        }
    }
}

impl From<CharacteristicError> for Error {
    fn from(e: CharacteristicError) -> Self {
        Self::Characteristic(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
