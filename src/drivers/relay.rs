//! Pump relay driver.
//!
//! Generic over any embedded-hal [`OutputPin`]; on ESP-IDF that is an
//! `esp_idf_hal::gpio::PinDriver`, on host a recording mock.  The relay
//! is energised (pin high) while the pump should run.

use embedded_hal::digital::OutputPin;
use log::warn;

pub struct Relay<P: OutputPin> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Take the pin and drive it to `initial_on` straight away.
    pub fn new(pin: P, initial_on: bool) -> Self {
        let mut relay = Self {
            pin,
            on: !initial_on,
        };
        relay.set(initial_on);
        relay
    }

    /// Best-effort write; a failing GPIO is logged, never propagated.
    pub fn set(&mut self, on: bool) {
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match result {
            Ok(()) => self.on = on,
            Err(e) => warn!("Relay: GPIO write failed: {:?}", e),
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
