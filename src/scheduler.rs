//! Drift-free periodic ticker.
//!
//! Every free-running task calls [`PeriodicTicker::wait`] after its work.
//! The ticker keeps an absolute deadline and sleeps only the remainder,
//! so processing time does not stretch the period.
//!
//! ```text
//!   deadline ──┬── work ──┬── sleep ──┬── work ──┬── sleep ──┬──▶
//!              │◀────── period ──────▶│◀────── period ──────▶│
//! ```
//!
//! When a cycle overruns its whole period the deadline is re-anchored at
//! `now + period` rather than firing a burst of catch-up ticks.

use core::time::Duration;

use log::warn;

/// Monotonic time source and sleeper.
pub trait Clock {
    /// Time since an arbitrary fixed origin.  Never goes backwards.
    fn now(&self) -> Duration;

    fn sleep(&self, duration: Duration);
}

pub struct PeriodicTicker {
    label: &'static str,
    period: Duration,
    deadline: Duration,
    overruns: u32,
}

impl PeriodicTicker {
    /// Ticker whose first deadline is one period after `clock.now()`.
    pub fn start(label: &'static str, period: Duration, clock: &impl Clock) -> Self {
        Self {
            label,
            period,
            deadline: clock.now() + period,
            overruns: 0,
        }
    }

    /// Sleep until the next deadline.  Returns how long it slept.
    pub fn wait(&mut self, clock: &impl Clock) -> Duration {
        let now = clock.now();
        if now >= self.deadline {
            let late = now - self.deadline;
            self.overruns = self.overruns.saturating_add(1);
            warn!(
                "{}: cycle overran by {} ms, resynchronising",
                self.label,
                late.as_millis()
            );
            self.deadline = now + self.period;
            return Duration::ZERO;
        }
        let remaining = self.deadline - now;
        clock.sleep(remaining);
        self.deadline += self.period;
        remaining
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Cycles that took longer than a full period.
    pub fn overruns(&self) -> u32 {
        self.overruns
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
