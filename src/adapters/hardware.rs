//! Hardware adapter: bridges the probes, relay and LED to the port traits.
//!
//! The probe bank is shared with the one-wire driver task, which records
//! conversions into it; this adapter only takes snapshots.  The relay and
//! LED drivers are generic over embedded-hal pins, so the same adapter
//! runs on ESP-IDF `PinDriver`s and on host mocks.

use std::sync::Arc;

use embedded_hal::digital::OutputPin;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::relay::Relay;
use crate::drivers::status_led::StatusLed;
use crate::sensors::TemperatureSnapshot;
use crate::sensors::probe_bank::ProbeBank;

pub struct HardwareAdapter<R: OutputPin, L: OutputPin> {
    probes: Arc<ProbeBank>,
    relay: Relay<R>,
    led: StatusLed<L>,
}

impl<R: OutputPin, L: OutputPin> HardwareAdapter<R, L> {
    pub fn new(probes: Arc<ProbeBank>, relay: Relay<R>, led: StatusLed<L>) -> Self {
        Self { probes, relay, led }
    }

    pub fn relay_on(&self) -> bool {
        self.relay.is_on()
    }

    pub fn led_lit(&self) -> bool {
        self.led.is_lit()
    }
}

impl<R: OutputPin, L: OutputPin> SensorPort for HardwareAdapter<R, L> {
    fn read_temperatures(&mut self) -> TemperatureSnapshot {
        self.probes.snapshot()
    }
}

impl<R: OutputPin, L: OutputPin> ActuatorPort for HardwareAdapter<R, L> {
    fn set_relay(&mut self, on: bool) {
        self.relay.set(on);
    }

    fn set_status_led(&mut self, on: bool) {
        self.led.set(on);
    }
}
