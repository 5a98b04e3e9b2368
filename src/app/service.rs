//! Pump controller: the hexagonal core.
//!
//! [`PumpController`] owns the hysteresis, run-timer and stall state and
//! is driven by the control task once per beat.  All I/O flows through
//! port traits injected at call sites.
//!
//! ```text
//!  SensorPort ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                 │        PumpController        │
//! ActuatorPort ◀──│ Hysteresis · RunTimer · Stall│──▶ TelemetryPort
//!                 └─────────────────────────────┘ ──▶ AccessoryPort
//!                          ▲ InhibitManager (shared)
//! ```
//!
//! Override priority within one tick: inhibit > forced run > hysteresis.
//! The relay is written once, with the fully resolved decision.

use log::{info, warn};

use crate::config::PumpConfig;
use crate::control::hysteresis::HysteresisController;
use crate::control::inhibit::InhibitManager;
use crate::control::run_timer::{RunTimer, RunTimerState};
use crate::control::stall::{StallDetector, StallState};
use crate::sensors::{SensorRole, TemperatureSnapshot};

use super::accessory::TemperatureCharacteristic;
use super::events::{AppEvent, StatusNote, TelemetryChannel};
use super::ports::{AccessoryPort, ActuatorPort, EventSink, SensorPort, TelemetryPort};

// ───────────────────────────────────────────────────────────────
// Snapshots
// ───────────────────────────────────────────────────────────────

/// Outcome of one control tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub snapshot: TemperatureSnapshot,
    /// Hysteresis demand before overrides.
    pub demand: bool,
    pub pump_on: bool,
    pub status: StatusNote,
    /// Scaled return drop, on the tick a stall window closed.
    pub stall_report: Option<f32>,
}

/// Read-only view of the controller's persistent state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    pub pump_on: bool,
    pub previous_pump_on: bool,
    pub force_run_countdown: u32,
    pub run_timer: RunTimerState,
    pub cumulative_on_secs: u32,
    pub inhibit_secs: u32,
    pub stall: StallState,
    pub reported_drop: f32,
}

// ───────────────────────────────────────────────────────────────
// PumpController
// ───────────────────────────────────────────────────────────────

pub struct PumpController {
    hysteresis: HysteresisController,
    run_timer: RunTimer,
    stall: StallDetector,
    temperature: TemperatureCharacteristic,
    beat_secs: u32,
    pump_on: bool,
    previous_pump_on: bool,
    tick_count: u64,
}

impl PumpController {
    /// Build the controller.  `config` must already be validated.
    pub fn new(config: &PumpConfig) -> Self {
        Self {
            hysteresis: HysteresisController::from_config(config),
            run_timer: RunTimer::from_config(config),
            stall: StallDetector::from_config(config),
            temperature: TemperatureCharacteristic::new(),
            beat_secs: config.beat_secs,
            pump_on: false,
            previous_pump_on: false,
            tick_count: 0,
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: read → decide → book-keep → actuate → report.
    ///
    /// `hw` satisfies both [`SensorPort`] and [`ActuatorPort`]; `link`
    /// both [`AccessoryPort`] and [`TelemetryPort`].  Never fails: degraded
    /// input freezes the demand, publish errors are logged.
    pub fn tick(
        &mut self,
        inhibit: &InhibitManager,
        hw: &mut (impl SensorPort + ActuatorPort),
        link: &mut (impl AccessoryPort + TelemetryPort),
        sink: &mut impl EventSink,
    ) -> TickReport {
        self.tick_count += 1;

        // 1. Snapshot
        let snapshot = hw.read_temperatures();

        // 2. Decision with overrides
        let demand = self.hysteresis.update(snapshot.supply());
        let (pump_on, status) = self.resolve(demand, inhibit);
        self.hysteresis.latch(pump_on);

        // 3. Edge detection and bookkeeping
        self.previous_pump_on = self.pump_on;
        self.pump_on = pump_on;
        let rising_edge = pump_on && !self.previous_pump_on;
        let stall_report = self
            .stall
            .observe(rising_edge, snapshot.return_line(), self.beat_secs);
        self.run_timer.advance(pump_on, self.beat_secs);

        // 4. Outputs
        hw.set_relay(pump_on);
        hw.set_status_led(pump_on);
        if pump_on != self.previous_pump_on {
            info!("Pump {}{}", if pump_on { "ON" } else { "OFF" }, status);
            sink.emit(&AppEvent::PumpSwitched { on: pump_on });
        }
        if pump_on && snapshot.is_known(SensorRole::Return) {
            if let Some(value) = self.temperature.update(snapshot.return_line()) {
                link.notify_temperature(value);
            }
        }

        // 5. Reporting
        sink.emit(&AppEvent::Tick {
            supply_c: snapshot.supply(),
            return_c: snapshot.return_line(),
            pump_on,
            status,
        });
        if let Some(drop) = stall_report {
            sink.emit(&AppEvent::StallReported(drop));
            Self::publish(link, sink, TelemetryChannel::ReturnDrop, drop);
        }
        Self::publish(link, sink, TelemetryChannel::Supply, snapshot.supply());
        Self::publish(link, sink, TelemetryChannel::Return, snapshot.return_line());

        TickReport {
            snapshot,
            demand,
            pump_on,
            status,
            stall_report,
        }
    }

    /// Apply forced run, then inhibit, to the hysteresis demand.
    fn resolve(&self, demand: bool, inhibit: &InhibitManager) -> (bool, StatusNote) {
        let mut decision = (demand, StatusNote::None);
        if self.run_timer.forcing() {
            decision = (true, StatusNote::ForcedRun);
        }
        if inhibit.is_active() {
            decision = (
                false,
                StatusNote::Inhibited {
                    display_secs: inhibit.display_secs(self.beat_secs),
                },
            );
        }
        decision
    }

    fn publish(
        link: &mut impl TelemetryPort,
        sink: &mut impl EventSink,
        channel: TelemetryChannel,
        value: f32,
    ) {
        if let Err(error) = link.publish(channel, value) {
            warn!("Telemetry {} dropped: {}", channel.name(), error);
            sink.emit(&AppEvent::PublishFailed { channel, error });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn control_state(&self, inhibit: &InhibitManager) -> ControlState {
        ControlState {
            pump_on: self.pump_on,
            previous_pump_on: self.previous_pump_on,
            force_run_countdown: self.run_timer.countdown(),
            run_timer: self.run_timer.state(),
            cumulative_on_secs: self.run_timer.cumulative_on(),
            inhibit_secs: inhibit.remaining(),
            stall: self.stall.state(),
            reported_drop: self.stall.last_report(),
        }
    }

    pub fn pump_on(&self) -> bool {
        self.pump_on
    }

    /// Value currently shown on the temperature characteristic.
    pub fn displayed_temperature(&self) -> f32 {
        self.temperature.value()
    }

    /// Control ticks executed since start-up.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
