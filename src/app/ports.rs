//! Port traits: the hexagonal boundary between the pump logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PumpController / InUseBridge
//! ```
//!
//! Driven adapters (probes, relay, accessory layer, MQTT, storage)
//! implement these traits.  The domain consumes them through generics so
//! the whole control path runs on the host against recording mocks.

use crate::config::{PumpConfig, RemoteSettings};
use crate::error::{PublishError, Result};
use crate::sensors::TemperatureSnapshot;

use super::events::{AppEvent, TelemetryChannel};

// ───────────────────────────────────────────────────────────────
// Sensor port (hardware → domain)
// ───────────────────────────────────────────────────────────────

pub trait SensorPort {
    /// Latest reading per role.  Failed or absent probes come back as the
    /// unknown sentinel; this never errors.
    fn read_temperatures(&mut self) -> TemperatureSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Best-effort GPIO writes.  There is no error channel.
pub trait ActuatorPort {
    fn set_relay(&mut self, on: bool);

    /// `on` is the pump state; the adapter handles LED polarity.
    fn set_status_led(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Accessory port (domain → external state observation)
// ───────────────────────────────────────────────────────────────

/// Pushes characteristic changes to the smart-home accessory layer.
pub trait AccessoryPort {
    /// Called only when the rounded value changed.
    fn notify_temperature(&mut self, celsius: f32);
    fn notify_active(&mut self, active: bool);
    fn notify_in_use(&mut self, in_use: bool);
}

// ───────────────────────────────────────────────────────────────
// Telemetry port (domain → message publisher)
// ───────────────────────────────────────────────────────────────

pub trait TelemetryPort {
    /// Hand one value to the publisher.  Failures are reported to the
    /// caller, which logs them; they never affect the pump decision.
    fn publish(&mut self, channel: TelemetryChannel, value: f32)
        -> core::result::Result<(), PublishError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (domain ↔ persistent settings)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the control configuration and remote settings.
///
/// Implementations validate before persisting; an invalid config is
/// rejected with [`Error::Config`](crate::error::Error::Config), never
/// clamped.
pub trait ConfigPort {
    /// Stored configuration, or [`PumpConfig::default()`] when none exists.
    fn load_config(&self) -> Result<PumpConfig>;

    fn save_config(&mut self, config: &PumpConfig) -> Result<()>;

    /// Remote settings; missing fields fall back to their placeholders.
    fn load_remote(&self) -> RemoteSettings;
}
