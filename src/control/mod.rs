//! Control primitives: pure logic, no I/O.
//!
//! Each piece is owned by exactly one task except [`inhibit::InhibitManager`],
//! which is shared through atomics.  The
//! [`PumpController`](crate::app::service::PumpController) combines them
//! once per beat.

pub mod hysteresis;
pub mod inhibit;
pub mod run_timer;
pub mod stall;
