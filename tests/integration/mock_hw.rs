//! Mock adapters for integration tests.
//!
//! Records every actuator, accessory and telemetry call so tests can
//! assert on the full history without touching GPIO or the network.

use std::collections::VecDeque;

use pumpswitch::app::events::{AppEvent, TelemetryChannel};
use pumpswitch::app::ports::{AccessoryPort, ActuatorPort, EventSink, SensorPort, TelemetryPort};
use pumpswitch::error::PublishError;
use pumpswitch::sensors::TemperatureSnapshot;

// ── Hardware ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorCall {
    Relay(bool),
    Led(bool),
}

/// Probe readings come from a script; the last entry repeats once the
/// script runs out.
pub struct MockHardware {
    script: VecDeque<(f32, f32)>,
    current: (f32, f32),
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(supply: f32, return_c: f32) -> Self {
        Self {
            script: VecDeque::new(),
            current: (supply, return_c),
            calls: Vec::new(),
        }
    }

    pub fn scripted(readings: &[(f32, f32)]) -> Self {
        let mut hw = Self::new(0.0, 0.0);
        hw.script.extend(readings.iter().copied());
        hw
    }

    pub fn set(&mut self, supply: f32, return_c: f32) {
        self.script.clear();
        self.current = (supply, return_c);
    }

    /// Every relay command, in order.
    pub fn relay_history(&self) -> Vec<bool> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::Relay(on) => Some(*on),
                ActuatorCall::Led(_) => None,
            })
            .collect()
    }

    pub fn relay_on(&self) -> bool {
        self.relay_history().last().copied().unwrap_or(false)
    }
}

impl SensorPort for MockHardware {
    fn read_temperatures(&mut self) -> TemperatureSnapshot {
        if let Some(next) = self.script.pop_front() {
            self.current = next;
        }
        TemperatureSnapshot::new(self.current.0, self.current.1)
    }
}

impl ActuatorPort for MockHardware {
    fn set_relay(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Relay(on));
    }

    fn set_status_led(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Led(on));
    }
}

// ── Accessory + telemetry ─────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    Temperature(f32),
    Active(bool),
    InUse(bool),
}

#[derive(Default)]
pub struct MockLink {
    pub notifications: Vec<Notification>,
    pub published: Vec<(TelemetryChannel, f32)>,
    /// Accept at most this many publishes; `None` accepts everything.
    pub capacity: Option<usize>,
}

#[allow(dead_code)]
impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saturated() -> Self {
        Self {
            capacity: Some(0),
            ..Self::default()
        }
    }

    pub fn published_on(&self, channel: TelemetryChannel) -> Vec<f32> {
        self.published
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, v)| *v)
            .collect()
    }
}

impl AccessoryPort for MockLink {
    fn notify_temperature(&mut self, celsius: f32) {
        self.notifications.push(Notification::Temperature(celsius));
    }

    fn notify_active(&mut self, active: bool) {
        self.notifications.push(Notification::Active(active));
    }

    fn notify_in_use(&mut self, in_use: bool) {
        self.notifications.push(Notification::InUse(in_use));
    }
}

impl TelemetryPort for MockLink {
    fn publish(&mut self, channel: TelemetryChannel, value: f32) -> Result<(), PublishError> {
        if self.capacity.is_some_and(|cap| self.published.len() >= cap) {
            return Err(PublishError::QueueFull);
        }
        self.published.push((channel, value));
        Ok(())
    }
}

// ── Events ────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
