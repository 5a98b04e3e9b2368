//! MQTT telemetry adapter.
//!
//! The control task must never wait on the network, so telemetry goes
//! through a bounded `embassy-sync` channel:
//!
//! ```text
//! ┌──────────────┐  TelemetryMessage  ┌────────────────┐   domoticz/in
//! │ state task   │───────────────────▶│ publish task   │──────────────▶ broker
//! │ (sync, try)  │   depth 6          │ (block_on recv)│
//! └──────────────┘                    └────────────────┘
//! ```
//!
//! A full queue is a publish failure: the value is dropped and the caller
//! logs it.  Payloads are domoticz device updates,
//! `{"idx":N,"nvalue":0,"svalue":"12.3"}`.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{info, warn};
use serde::Serialize;

use crate::app::events::TelemetryChannel;
use crate::app::ports::TelemetryPort;
use crate::error::PublishError;

pub const TELEMETRY_TOPIC: &str = "domoticz/in";

const QUEUE_DEPTH: usize = 6;

/// One value addressed to a domoticz device index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryMessage {
    pub idx: u32,
    pub value: f32,
}

#[derive(Serialize)]
struct DomoticzUpdate<'a> {
    idx: u32,
    nvalue: u8,
    svalue: &'a str,
}

impl TelemetryMessage {
    pub fn payload(&self) -> Result<String, PublishError> {
        let svalue = format!("{:.1}", self.value);
        serde_json::to_string(&DomoticzUpdate {
            idx: self.idx,
            nvalue: 0,
            svalue: &svalue,
        })
        .map_err(|_| PublishError::Encoding)
    }
}

pub type TelemetryQueue = Channel<CriticalSectionRawMutex, TelemetryMessage, QUEUE_DEPTH>;

/// Queue between the control task and the publish task.
pub static TELEMETRY_QUEUE: TelemetryQueue = Channel::new();

// ───────────────────────────────────────────────────────────────
// Producer side
// ───────────────────────────────────────────────────────────────

/// [`TelemetryPort`] that enqueues without blocking.
pub struct QueuedTelemetry {
    base_index: u32,
    queue: &'static TelemetryQueue,
}

impl QueuedTelemetry {
    pub fn new(base_index: u32, queue: &'static TelemetryQueue) -> Self {
        Self { base_index, queue }
    }
}

impl TelemetryPort for QueuedTelemetry {
    fn publish(&mut self, channel: TelemetryChannel, value: f32) -> Result<(), PublishError> {
        let msg = TelemetryMessage {
            idx: self.base_index + channel.index_offset(),
            value,
        };
        self.queue.try_send(msg).map_err(|_| PublishError::QueueFull)
    }
}

// ───────────────────────────────────────────────────────────────
// Consumer side
// ───────────────────────────────────────────────────────────────

/// Anything that can put a payload on a topic.
pub trait MqttSink {
    fn send(&mut self, topic: &str, payload: &str) -> Result<(), PublishError>;
}

/// Wait for the next queued value and hand it to `sink`.
pub async fn publish_next(queue: &TelemetryQueue, sink: &mut impl MqttSink) -> Result<(), PublishError> {
    let msg = queue.receive().await;
    let payload = msg.payload()?;
    sink.send(TELEMETRY_TOPIC, &payload)
}

/// Publish task body.  Never returns.
pub fn run_publisher(queue: &'static TelemetryQueue, mut sink: impl MqttSink) -> ! {
    info!("MQTT: publisher running on '{}'", TELEMETRY_TOPIC);
    loop {
        if let Err(e) = futures_lite::future::block_on(publish_next(queue, &mut sink)) {
            warn!("MQTT: publish failed: {}", e);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF client
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp::EspMqttSink;

#[cfg(target_os = "espidf")]
mod esp {
    use core::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use esp_idf_svc::mqtt::client::{
        EspMqttClient, EventPayload, MqttClientConfiguration, QoS,
    };
    use log::{info, warn};

    use super::MqttSink;
    use crate::config::RemoteSettings;
    use crate::error::{Error, PublishError, Result};

    pub struct EspMqttSink {
        client: EspMqttClient<'static>,
        connected: Arc<AtomicBool>,
    }

    impl EspMqttSink {
        pub fn connect(remote: &RemoteSettings) -> Result<Self> {
            let conf = MqttClientConfiguration {
                client_id: Some("pumpswitch"),
                username: Some(remote.mqtt_user.as_str()),
                password: Some(remote.mqtt_password.as_str()),
                ..Default::default()
            };
            let connected = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&connected);
            let client = EspMqttClient::new_cb(&remote.mqtt_url(), &conf, move |event| {
                match event.payload() {
                    EventPayload::Connected(_) => {
                        info!("MQTT: connected");
                        flag.store(true, Ordering::Release);
                    }
                    EventPayload::Disconnected => {
                        warn!("MQTT: disconnected");
                        flag.store(false, Ordering::Release);
                    }
                    _ => {}
                }
            })
            .map_err(|_| Error::Init("mqtt client"))?;
            info!("MQTT: client for {}", remote.mqtt_url());
            Ok(Self { client, connected })
        }
    }

    impl MqttSink for EspMqttSink {
        fn send(&mut self, topic: &str, payload: &str) -> core::result::Result<(), PublishError> {
            if !self.connected.load(Ordering::Acquire) {
                return Err(PublishError::NotConnected);
            }
            self.client
                .enqueue(topic, QoS::AtMostOnce, false, payload.as_bytes())
                .map(|_| ())
                .map_err(|e| PublishError::ClientRejected(e.code()))
        }
    }
}
