//! Periodic forced circulation.
//!
//! A countdown runs from `repeat` to zero.  While it sits in
//! `(0, run]` the pump is forced on, which gives exactly `run` seconds
//! of circulation per period.  The countdown restarts at `repeat` when it
//! reaches zero, or earlier when the pump has already been running
//! continuously for longer than `run` (the loop was flushed anyway).
//!
//! ```text
//!            countdown <= run
//!   IDLE ───────────────────────▶ FORCED RUN
//!    ▲                                │
//!    └────── countdown reset ─────────┘
//! ```

use log::info;

use crate::config::PumpConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunTimerState {
    Idle,
    ForcedRun,
}

pub struct RunTimer {
    run_secs: u32,
    repeat_secs: u32,
    countdown: u32,
    cumulative_on: u32,
}

impl RunTimer {
    /// Timer whose countdown starts at `countdown` (clamped to `repeat`).
    pub fn new(run_secs: u32, repeat_secs: u32, countdown: u32) -> Self {
        Self {
            run_secs,
            repeat_secs,
            countdown: countdown.min(repeat_secs),
            cumulative_on: 0,
        }
    }

    /// With `run_on_boot` the first period is only `run` long, so the pump
    /// circulates straight after start-up.
    pub fn from_config(config: &PumpConfig) -> Self {
        let start = if config.run_on_boot {
            config.run_secs
        } else {
            config.repeat_secs
        };
        Self::new(config.run_secs, config.repeat_secs, start)
    }

    pub fn state(&self) -> RunTimerState {
        Self::state_for(self.countdown, self.run_secs)
    }

    fn state_for(countdown: u32, run_secs: u32) -> RunTimerState {
        if countdown > 0 && countdown <= run_secs {
            RunTimerState::ForcedRun
        } else {
            RunTimerState::Idle
        }
    }

    /// Whether this tick's decision must be forced on.
    pub fn forcing(&self) -> bool {
        self.state() == RunTimerState::ForcedRun
    }

    /// Book `elapsed_secs` of wall time with the tick's final decision.
    pub fn advance(&mut self, pump_on: bool, elapsed_secs: u32) -> RunTimerState {
        let before = self.state();

        self.cumulative_on = if pump_on {
            // Only needs to get past the threshold once.
            (self.cumulative_on + elapsed_secs).min(self.run_secs + elapsed_secs)
        } else {
            0
        };

        self.countdown = self.countdown.saturating_sub(elapsed_secs);
        if self.countdown == 0 || self.cumulative_on > self.run_secs {
            self.countdown = self.repeat_secs;
        }

        let after = self.state();
        match (before, after) {
            (RunTimerState::Idle, RunTimerState::ForcedRun) => {
                info!("RunTimer: forced run for the next {}s", self.countdown);
            }
            (RunTimerState::ForcedRun, RunTimerState::Idle) => {
                info!("RunTimer: forced run complete, next in {}s", self.countdown);
            }
            _ => {}
        }
        after
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn cumulative_on(&self) -> u32 {
        self.cumulative_on
    }
}
