//! Single status LED, wired active-low (lit when the pin is low).
//!
//! Mirrors the pump state: lit while the pump runs.

use embedded_hal::digital::OutputPin;
use log::warn;

pub struct StatusLed<P: OutputPin> {
    pin: P,
    lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: P, lit: bool) -> Self {
        let mut led = Self { pin, lit: !lit };
        led.set(lit);
        led
    }

    pub fn set(&mut self, lit: bool) {
        // Active-low.
        let result = if lit {
            self.pin.set_low()
        } else {
            self.pin.set_high()
        };
        match result {
            Ok(()) => self.lit = lit,
            Err(e) => warn!("StatusLed: GPIO write failed: {:?}", e),
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
