//! Outbound application events and telemetry channels.
//!
//! The [`PumpController`](super::service::PumpController) and the
//! [`InUseBridge`](super::in_use::InUseBridge) emit these through the
//! [`EventSink`](super::ports::EventSink) port.  The log adapter turns
//! them into console lines.

use core::fmt;

use crate::error::PublishError;

/// Why the final decision differs from the hysteresis demand, if it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusNote {
    None,
    ForcedRun,
    /// Remaining inhibit, rounded up to the next beat.
    Inhibited { display_secs: u32 },
}

impl fmt::Display for StatusNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::ForcedRun => write!(f, " TIMER activated"),
            Self::Inhibited { display_secs } => {
                write!(f, " inhibited for another {display_secs} seconds")
            }
        }
    }
}

/// Values published to the home-automation broker.  Each is filed under
/// `base_index + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryChannel {
    Supply,
    Return,
    ReturnDrop,
}

impl TelemetryChannel {
    pub fn index_offset(self) -> u32 {
        match self {
            Self::Supply => 0,
            Self::Return => 1,
            Self::ReturnDrop => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Supply => "supply",
            Self::Return => "return",
            Self::ReturnDrop => "return_drop",
        }
    }
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// One control tick completed.
    Tick {
        supply_c: f32,
        return_c: f32,
        pump_on: bool,
        status: StatusNote,
    },
    /// The final decision changed.
    PumpSwitched { on: bool },
    /// A stall window closed with this scaled drop.
    StallReported(f32),
    /// Telemetry could not be handed over.
    PublishFailed {
        channel: TelemetryChannel,
        error: PublishError,
    },
    /// The accessory was paused; in-use dropped while it settles.
    InUseDropped,
    /// In-use restored, cooldown applied.
    InUseRestored { cooldown_secs: u32 },
}
