//! Dead-band on/off control on the supply-line temperature.
//!
//! Demand turns on above `setpoint + hysteresis/2`, off below
//! `setpoint - hysteresis/2`, and holds inside the band.  An unknown
//! supply reading never changes the demand.
//!
//! The held state is the last *resolved* pump decision: the owner calls
//! [`HysteresisController::latch`] after applying overrides, so a forced
//! run or an inhibit carries into the dead-band on the next tick.

use crate::config::PumpConfig;
use crate::sensors::is_unknown;

pub struct HysteresisController {
    upper_c: f32,
    lower_c: f32,
    demand: bool,
}

impl HysteresisController {
    pub fn new(setpoint_c: f32, hysteresis_c: f32, initial_demand: bool) -> Self {
        Self {
            upper_c: setpoint_c + hysteresis_c / 2.0,
            lower_c: setpoint_c - hysteresis_c / 2.0,
            demand: initial_demand,
        }
    }

    /// Controller for `config`.  Demand starts on, so the first tick
    /// inside the band keeps the pump running.
    pub fn from_config(config: &PumpConfig) -> Self {
        Self::new(config.setpoint_c, config.hysteresis_c, true)
    }

    /// Pure decision: new demand for `supply_c` given the `previous` one.
    pub fn evaluate(&self, supply_c: f32, previous: bool) -> bool {
        if is_unknown(supply_c) || supply_c.is_nan() {
            previous
        } else if supply_c > self.upper_c {
            true
        } else if supply_c < self.lower_c {
            false
        } else {
            previous
        }
    }

    /// Evaluate against the stored demand and keep the result.
    pub fn update(&mut self, supply_c: f32) -> bool {
        self.demand = self.evaluate(supply_c, self.demand);
        self.demand
    }

    /// Replace the held state with the final decision of this tick.
    pub fn latch(&mut self, decision: bool) {
        self.demand = decision;
    }

    pub fn demand(&self) -> bool {
        self.demand
    }
}
