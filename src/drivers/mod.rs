//! GPIO drivers, the probe bus and task plumbing.

pub mod button;
pub mod onewire;
pub mod relay;
pub mod status_led;
pub mod task_pin;
pub mod watchdog;
