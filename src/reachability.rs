//! Network reachability watchdog.
//!
//! Pings a configured host with an adaptive interval.  Each success earns
//! credit (up to a cap) and backs the interval off; each failure spends
//! one credit and drops back to the fastest interval.  When the credit
//! runs out the device restarts, which recovers a wedged network stack.

use core::time::Duration;

use log::{error, warn};

/// Tuning for [`ReachabilityWatchdog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachabilityConfig {
    pub initial_credit: u32,
    pub max_credit: u32,
    pub credit_per_success: u32,
    pub min_delay_secs: u32,
    pub max_delay_secs: u32,
    pub delay_step_secs: u32,
}

impl Default for ReachabilityConfig {
    fn default() -> Self {
        Self {
            initial_credit: 120,
            max_credit: 120,
            credit_per_success: 10,
            min_delay_secs: 1,
            max_delay_secs: 60,
            delay_step_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Ping again after this delay.
    Continue { next_delay: Duration },
    /// Credit exhausted.
    Restart,
}

pub struct ReachabilityWatchdog {
    config: ReachabilityConfig,
    credit: u32,
    delay_secs: u32,
}

impl ReachabilityWatchdog {
    pub fn new(config: ReachabilityConfig) -> Self {
        Self {
            credit: config.initial_credit,
            delay_secs: config.min_delay_secs,
            config,
        }
    }

    /// Book the outcome of one ping.
    pub fn record(&mut self, reachable: bool) -> Verdict {
        let c = &self.config;
        if reachable {
            self.credit = (self.credit + c.credit_per_success).min(c.max_credit);
            self.delay_secs = (self.delay_secs + c.delay_step_secs).min(c.max_delay_secs);
        } else {
            self.credit = self.credit.saturating_sub(1);
            self.delay_secs = c.min_delay_secs;
            warn!("Reachability: ping failed, {} attempts left", self.credit);
        }

        if self.credit == 0 {
            error!("Reachability: target unreachable, restarting");
            return Verdict::Restart;
        }
        Verdict::Continue {
            next_delay: Duration::from_secs(u64::from(self.delay_secs)),
        }
    }

    pub fn credit(&self) -> u32 {
        self.credit
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.delay_secs))
    }
}

impl Default for ReachabilityWatchdog {
    fn default() -> Self {
        Self::new(ReachabilityConfig::default())
    }
}
