//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements          | Connects to                  |
//! |-------------|---------------------|------------------------------|
//! | `accessory` | AccessoryPort       | Accessory characteristic log |
//! | `hardware`  | SensorPort          | 1-Wire probe bank            |
//! |             | ActuatorPort        | Relay + status LED GPIO      |
//! | `log_sink`  | EventSink           | Serial log output            |
//! | `mqtt`      | TelemetryPort       | Queue → ESP-IDF MQTT client  |
//! | `settings`  | ConfigPort          | NVS / in-memory store        |
//! | `time`      | Clock               | ESP32 system timer           |
//! | `wifi`      | (none)              | ESP-IDF WiFi STA             |

pub mod accessory;
pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod settings;
pub mod time;
pub mod wifi;

use crate::app::events::TelemetryChannel;
use crate::app::ports::{AccessoryPort, TelemetryPort};
use crate::error::PublishError;

/// Everything the control loop talks to besides the hardware.
pub struct Outbound<A, T> {
    pub accessory: A,
    pub telemetry: T,
}

impl<A: AccessoryPort, T> AccessoryPort for Outbound<A, T> {
    fn notify_temperature(&mut self, celsius: f32) {
        self.accessory.notify_temperature(celsius);
    }

    fn notify_active(&mut self, active: bool) {
        self.accessory.notify_active(active);
    }

    fn notify_in_use(&mut self, in_use: bool) {
        self.accessory.notify_in_use(in_use);
    }
}

impl<A, T: TelemetryPort> TelemetryPort for Outbound<A, T> {
    fn publish(&mut self, channel: TelemetryChannel, value: f32) -> Result<(), PublishError> {
        self.telemetry.publish(channel, value)
    }
}
