//! Return-line drop after a pump start.
//!
//! When the pump switches on, cold water from the loop reaches the return
//! probe.  The detector records the return temperature at the start,
//! tracks the minimum over a fixed window, and reports
//! `min(start - minimum, max_drop) * scale` once when the window closes.
//! A small value means the loop was still warm or the pump is not moving
//! water.

use log::{info, warn};

use crate::config::PumpConfig;
use crate::sensors::is_unknown;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StallState {
    Idle,
    Observing {
        /// First known return reading of the window.
        start: Option<f32>,
        minimum: f32,
        remaining_secs: u32,
    },
    Reported,
}

pub struct StallDetector {
    window_secs: u32,
    max_drop_c: f32,
    scale: f32,
    state: StallState,
    last_report: f32,
}

impl StallDetector {
    pub fn new(window_secs: u32, max_drop_c: f32, scale: f32) -> Self {
        Self {
            window_secs,
            max_drop_c,
            scale,
            state: StallState::Idle,
            last_report: 0.0,
        }
    }

    pub fn from_config(config: &PumpConfig) -> Self {
        Self::new(config.stall_window_secs, config.max_drop_c, config.drop_scale)
    }

    /// Feed one tick.  `rising_edge` is true on the tick the pump switched
    /// on; it (re)starts the window.  Returns the scaled drop on the tick
    /// the window closes.
    pub fn observe(&mut self, rising_edge: bool, return_c: f32, elapsed_secs: u32) -> Option<f32> {
        if rising_edge {
            self.state = StallState::Observing {
                start: None,
                minimum: f32::INFINITY,
                remaining_secs: self.window_secs,
            };
        }

        let StallState::Observing {
            mut start,
            mut minimum,
            remaining_secs,
        } = self.state
        else {
            return None;
        };

        if !is_unknown(return_c) && return_c.is_finite() {
            start.get_or_insert(return_c);
            minimum = minimum.min(return_c);
        }
        let remaining_secs = remaining_secs.saturating_sub(elapsed_secs);

        if remaining_secs > 0 {
            self.state = StallState::Observing {
                start,
                minimum,
                remaining_secs,
            };
            return None;
        }

        let Some(start) = start else {
            warn!("Stall: no return reading during the window, nothing reported");
            self.state = StallState::Idle;
            return None;
        };

        let drop = (start - minimum).clamp(0.0, self.max_drop_c);
        self.last_report = drop * self.scale;
        self.state = StallState::Reported;
        info!(
            "Stall: return fell {:.2}C from {:.2}C, reporting {:.1}",
            start - minimum,
            start,
            self.last_report
        );
        Some(self.last_report)
    }

    pub fn state(&self) -> StallState {
        self.state
    }

    /// Most recent reported value (0 before the first report).
    pub fn last_report(&self) -> f32 {
        self.last_report
    }
}
