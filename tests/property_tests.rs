//! Property tests for the control loop as a whole.
//!
//! Runs on host (x86_64) only; proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;

use pumpswitch::app::accessory::TemperatureCharacteristic;
use pumpswitch::app::events::{AppEvent, StatusNote, TelemetryChannel};
use pumpswitch::app::ports::{AccessoryPort, ActuatorPort, EventSink, SensorPort, TelemetryPort};
use pumpswitch::app::service::PumpController;
use pumpswitch::config::PumpConfig;
use pumpswitch::control::inhibit::{InhibitManager, PressKind, PressTiers};
use pumpswitch::error::PublishError;
use pumpswitch::sensors::{TemperatureSnapshot, UNKNOWN_CELSIUS};

// ── Minimal rig ───────────────────────────────────────────────

struct Rig {
    supply: f32,
    return_c: f32,
    relay: Option<bool>,
    notified: u32,
}

impl Rig {
    fn new(supply: f32, return_c: f32) -> Self {
        Self {
            supply,
            return_c,
            relay: None,
            notified: 0,
        }
    }
}

impl SensorPort for Rig {
    fn read_temperatures(&mut self) -> TemperatureSnapshot {
        TemperatureSnapshot::new(self.supply, self.return_c)
    }
}

impl ActuatorPort for Rig {
    fn set_relay(&mut self, on: bool) {
        self.relay = Some(on);
    }
    fn set_status_led(&mut self, _on: bool) {}
}

impl AccessoryPort for Rig {
    fn notify_temperature(&mut self, _celsius: f32) {
        self.notified += 1;
    }
    fn notify_active(&mut self, _active: bool) {}
    fn notify_in_use(&mut self, _in_use: bool) {}
}

impl TelemetryPort for Rig {
    fn publish(&mut self, _channel: TelemetryChannel, _value: f32) -> Result<(), PublishError> {
        Ok(())
    }
}

struct Drops(Vec<f32>);

impl EventSink for Drops {
    fn emit(&mut self, event: &AppEvent) {
        if let AppEvent::StallReported(v) = event {
            self.0.push(*v);
        }
    }
}

fn tick(ctl: &mut PumpController, inhibit: &InhibitManager, hw: &mut Rig, sink: &mut Drops) -> bool {
    let mut link = Rig::new(0.0, 0.0);
    let on = ctl.tick(inhibit, hw, &mut link, sink).pump_on;
    hw.notified += link.notified;
    on
}

fn known_reading() -> impl Strategy<Value = f32> {
    10.0f32..90.0
}

// ── Override priority ─────────────────────────────────────────

proptest! {
    /// Any positive inhibit forces the relay off, forced run or not.
    #[test]
    fn inhibit_always_wins(
        supplies in proptest::collection::vec(known_reading(), 1..40),
        inhibit_secs in 1u32..10_000,
        run_on_boot: bool,
    ) {
        let cfg = PumpConfig { run_on_boot, ..PumpConfig::default() };
        let mut ctl = PumpController::new(&cfg);
        let inhibit = InhibitManager::new();
        inhibit.set(inhibit_secs);
        let mut sink = Drops(Vec::new());
        for s in supplies {
            let mut hw = Rig::new(s, 35.0);
            prop_assert!(!tick(&mut ctl, &inhibit, &mut hw, &mut sink));
            prop_assert_eq!(hw.relay, Some(false));
        }
    }

    /// With a cold loop, forced runs are contiguous blocks of exactly
    /// `run` seconds, one per `repeat` period.
    #[test]
    fn forced_runs_are_contiguous_and_periodic(
        beat in prop_oneof![Just(5u32), Just(10u32)],
        run_beats in 1u32..6,
        gap_beats in 1u32..15,
        periods in 1usize..4,
    ) {
        let cfg = PumpConfig {
            beat_secs: beat,
            run_secs: run_beats * beat,
            repeat_secs: (run_beats + gap_beats) * beat,
            stop_for_secs: beat,
            stall_window_secs: beat,
            run_on_boot: false,
            ..PumpConfig::default()
        };
        prop_assert!(cfg.validate().is_ok());
        let period = (run_beats + gap_beats) as usize;
        let mut ctl = PumpController::new(&cfg);
        let inhibit = InhibitManager::new();
        let mut hw = Rig::new(20.0, 20.0);
        let mut sink = Drops(Vec::new());
        for i in 0..period * periods {
            let expected = i % period >= gap_beats as usize;
            prop_assert_eq!(tick(&mut ctl, &inhibit, &mut hw, &mut sink), expected, "tick {}", i + 1);
        }
    }

    /// Inside the band, an un-overridden tick repeats the previous final
    /// decision, including one produced by a forced run or an inhibit.
    #[test]
    fn dead_band_holds_previous_final_decision(
        steps in proptest::collection::vec(
            (35.0f32..55.0, proptest::option::of(0u32..40)),
            1..60,
        ),
        run_on_boot: bool,
    ) {
        let cfg = PumpConfig {
            run_secs: 20,
            repeat_secs: 60,
            run_on_boot,
            ..PumpConfig::default()
        };
        let band = cfg.lower_threshold()..=cfg.upper_threshold();
        let mut ctl = PumpController::new(&cfg);
        let inhibit = InhibitManager::new();
        let mut sink = Drops(Vec::new());
        // Held state before the first tick.
        let mut previous = true;
        for (supply, press) in steps {
            if let Some(secs) = press {
                inhibit.set(secs);
            }
            let mut hw = Rig::new(supply, 35.0);
            let mut link = Rig::new(0.0, 0.0);
            let report = ctl.tick(&inhibit, &mut hw, &mut link, &mut sink);
            if report.status == StatusNote::None && band.contains(&supply) {
                prop_assert_eq!(report.pump_on, previous, "supply {}", supply);
            }
            previous = report.pump_on;
            inhibit.tick_second();
        }
    }

    /// An unknown supply reading repeats the previous decision.
    #[test]
    fn unknown_supply_freezes_decision(
        supplies in proptest::collection::vec(known_reading(), 1..20),
    ) {
        let mut ctl = PumpController::new(&PumpConfig { run_on_boot: false, ..PumpConfig::default() });
        let inhibit = InhibitManager::new();
        let mut sink = Drops(Vec::new());
        for s in supplies {
            let before = tick(&mut ctl, &inhibit, &mut Rig::new(s, 35.0), &mut sink);
            let after = tick(&mut ctl, &inhibit, &mut Rig::new(UNKNOWN_CELSIUS, 35.0), &mut sink);
            prop_assert_eq!(before, after);
        }
    }
}

// ── Stall reporting ───────────────────────────────────────────

proptest! {
    /// Reports stay within `[0, max_drop * scale]` whatever the readings.
    #[test]
    fn stall_report_is_bounded(
        returns in proptest::collection::vec(known_reading(), 12..30),
    ) {
        let cfg = PumpConfig { run_on_boot: false, ..PumpConfig::default() };
        let ceiling = cfg.max_drop_c * cfg.drop_scale;
        let mut ctl = PumpController::new(&cfg);
        let inhibit = InhibitManager::new();
        let mut sink = Drops(Vec::new());
        for r in returns {
            tick(&mut ctl, &inhibit, &mut Rig::new(60.0, r), &mut sink);
        }
        prop_assert_eq!(sink.0.len(), 1);
        prop_assert!((0.0..=ceiling).contains(&sink.0[0]));
    }
}

#[test]
fn stall_report_for_point_eight_degrees() {
    let mut ctl = PumpController::new(&PumpConfig {
        run_on_boot: false,
        ..PumpConfig::default()
    });
    let inhibit = InhibitManager::new();
    let mut sink = Drops(Vec::new());
    tick(&mut ctl, &inhibit, &mut Rig::new(50.0, 40.0), &mut sink);
    for _ in 0..11 {
        tick(&mut ctl, &inhibit, &mut Rig::new(50.0, 39.2), &mut sink);
    }
    assert_eq!(sink.0.len(), 1);
    assert!((sink.0[0] - 12.8).abs() < 1e-3);
}

// ── End-to-end hysteresis ─────────────────────────────────────

#[test]
fn end_to_end_band_sequence() {
    let mut ctl = PumpController::new(&PumpConfig {
        run_on_boot: false,
        ..PumpConfig::default()
    });
    let inhibit = InhibitManager::new();
    let mut sink = Drops(Vec::new());
    let decisions: Vec<bool> = [42.0, 44.0, 48.0, 44.0, 41.0]
        .into_iter()
        .map(|s| tick(&mut ctl, &inhibit, &mut Rig::new(s, 35.0), &mut sink))
        .collect();
    assert_eq!(decisions, vec![false, false, true, true, false]);
}

// ── Presses and notifications ─────────────────────────────────

fn arb_press() -> impl Strategy<Value = PressKind> {
    prop_oneof![
        Just(PressKind::Single),
        Just(PressKind::Double),
        Just(PressKind::Long),
    ]
}

proptest! {
    /// Presses overwrite; the last one decides the countdown.
    #[test]
    fn last_press_wins(presses in proptest::collection::vec(arb_press(), 1..10)) {
        let tiers = PressTiers::default();
        let inhibit = InhibitManager::new();
        for &p in &presses {
            inhibit.apply_press(p, &tiers);
        }
        let last = presses[presses.len() - 1];
        prop_assert_eq!(inhibit.remaining(), tiers.secs_for(last));
    }

    /// Repeating a value that rounds the same never notifies twice.
    #[test]
    fn temperature_notifies_once_per_rounded_value(c in known_reading(), repeats in 2usize..6) {
        let mut characteristic = TemperatureCharacteristic::new();
        let notified = (0..repeats).filter(|_| characteristic.update(c).is_some()).count();
        prop_assert!(notified <= 1);
    }

    /// Same through the controller: a steady return line notifies at most once.
    #[test]
    fn steady_return_notifies_once(r in known_reading(), ticks in 2usize..10) {
        let mut ctl = PumpController::new(&PumpConfig { run_on_boot: false, ..PumpConfig::default() });
        let inhibit = InhibitManager::new();
        let mut sink = Drops(Vec::new());
        let mut hw = Rig::new(60.0, r);
        for _ in 0..ticks {
            tick(&mut ctl, &inhibit, &mut hw, &mut sink);
        }
        prop_assert!(hw.notified <= 1);
    }
}

#[test]
fn short_tap_then_long_press_resets() {
    let tiers = PressTiers::default();
    let inhibit = InhibitManager::new();
    inhibit.apply_press(PressKind::Single, &tiers);
    assert_eq!(inhibit.remaining(), 900);
    inhibit.apply_press(PressKind::Long, &tiers);
    assert_eq!(inhibit.remaining(), 5);
}
