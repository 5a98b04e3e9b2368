//! Accessory notifier adapter.
//!
//! Stands in for the smart-home accessory server: every characteristic
//! change the domain pushes is logged under the characteristic name the
//! server would publish it as.  The last notified values are kept so the
//! server (or a test) can read them back.

use log::info;

use crate::app::ports::AccessoryPort;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct NotifiedValues {
    pub temperature: Option<f32>,
    pub active: Option<bool>,
    pub in_use: Option<bool>,
    /// Total notifications sent.
    pub count: u32,
}

#[derive(Default)]
pub struct LogAccessoryNotifier {
    last: NotifiedValues,
}

impl LogAccessoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> NotifiedValues {
        self.last
    }
}

impl AccessoryPort for LogAccessoryNotifier {
    fn notify_temperature(&mut self, celsius: f32) {
        info!("HK | CurrentTemperature = {:.1}", celsius);
        self.last.temperature = Some(celsius);
        self.last.count += 1;
    }

    fn notify_active(&mut self, active: bool) {
        info!("HK | Active = {}", u8::from(active));
        self.last.active = Some(active);
        self.last.count += 1;
    }

    fn notify_in_use(&mut self, in_use: bool) {
        info!("HK | InUse = {}", u8::from(in_use));
        self.last.in_use = Some(in_use);
        self.last.count += 1;
    }
}
