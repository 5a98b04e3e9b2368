//! GPIO pin assignments for the pump switch board.
//!
//! Single source of truth: drivers and `main()` reference this module
//! rather than hard-coding pin numbers.

/// Relay driving the pump motor.  HIGH = pump running.
pub const RELAY_GPIO: i32 = 12;

/// Status LED, wired active-low (LOW = lit = pump running).
pub const LED_GPIO: i32 = 13;

/// One-wire bus with the supply and return DS18B20 probes.
/// Needs the internal pull-up; the bus itself is driven by the probe driver.
pub const SENSOR_GPIO: i32 = 2;

/// Momentary push-button, active-low with pull-up.
pub const BUTTON_GPIO: i32 = 0;
