//! Full control-loop scenarios: PumpController against recording mocks.

use pumpswitch::app::events::{AppEvent, StatusNote, TelemetryChannel};
use pumpswitch::app::service::PumpController;
use pumpswitch::config::PumpConfig;
use pumpswitch::control::inhibit::{InhibitManager, PressKind, PressTiers};
use pumpswitch::sensors::UNKNOWN_CELSIUS;

use crate::mock_hw::{MockHardware, MockLink, Notification, RecordingSink};

fn no_boot_run() -> PumpConfig {
    PumpConfig {
        run_on_boot: false,
        ..PumpConfig::default()
    }
}

fn run_ticks(
    ctl: &mut PumpController,
    inhibit: &InhibitManager,
    hw: &mut MockHardware,
    link: &mut MockLink,
    sink: &mut RecordingSink,
    n: usize,
) -> Vec<bool> {
    (0..n)
        .map(|_| ctl.tick(inhibit, hw, link, sink).pump_on)
        .collect()
}

#[test]
fn hysteresis_sequence_drives_relay() {
    let mut ctl = PumpController::new(&no_boot_run());
    let inhibit = InhibitManager::new();
    let mut hw = MockHardware::scripted(&[
        (42.0, 35.0),
        (44.0, 35.0),
        (48.0, 35.0),
        (44.0, 35.0),
        (41.0, 35.0),
    ]);
    let mut link = MockLink::new();
    let mut sink = RecordingSink::new();

    let decisions = run_ticks(&mut ctl, &inhibit, &mut hw, &mut link, &mut sink, 5);
    assert_eq!(decisions, vec![false, false, true, true, false]);
    assert_eq!(hw.relay_history(), decisions);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::PumpSwitched { .. })),
        2,
        "one switch on, one switch off"
    );
}

#[test]
fn boot_run_lasts_exactly_run_secs() {
    let cfg = PumpConfig::default();
    let mut ctl = PumpController::new(&cfg);
    let inhibit = InhibitManager::new();
    let mut hw = MockHardware::new(30.0, 30.0);
    let mut link = MockLink::new();
    let mut sink = RecordingSink::new();

    let ticks = (cfg.run_secs / cfg.beat_secs) as usize;
    let decisions = run_ticks(&mut ctl, &inhibit, &mut hw, &mut link, &mut sink, ticks + 3);
    assert!(decisions[..ticks].iter().all(|&on| on));
    assert!(decisions[ticks..].iter().all(|&on| !on));

    let forced = sink.count(|e| {
        matches!(
            e,
            AppEvent::Tick {
                status: StatusNote::ForcedRun,
                ..
            }
        )
    });
    assert_eq!(forced, ticks);
}

#[test]
fn forced_run_repeats_every_period() {
    let cfg = PumpConfig {
        run_secs: 20,
        repeat_secs: 60,
        ..no_boot_run()
    };
    let mut ctl = PumpController::new(&cfg);
    let inhibit = InhibitManager::new();
    let mut hw = MockHardware::new(30.0, 30.0);
    let mut link = MockLink::new();
    let mut sink = RecordingSink::new();

    let decisions = run_ticks(&mut ctl, &inhibit, &mut hw, &mut link, &mut sink, 12);
    let on_ticks: Vec<usize> = decisions
        .iter()
        .enumerate()
        .filter(|(_, on)| **on)
        .map(|(i, _)| i + 1)
        .collect();
    assert_eq!(on_ticks, vec![5, 6, 11, 12]);
}

#[test]
fn button_press_holds_pump_off_until_countdown_ends() {
    let cfg = no_boot_run();
    let mut ctl = PumpController::new(&cfg);
    let inhibit = InhibitManager::new();
    let tiers = PressTiers {
        single_secs: 30,
        ..PressTiers::from_config(&cfg)
    };
    let mut hw = MockHardware::new(50.0, 40.0);
    let mut link = MockLink::new();
    let mut sink = RecordingSink::new();

    assert!(ctl.tick(&inhibit, &mut hw, &mut link, &mut sink).pump_on);

    inhibit.apply_press(PressKind::Single, &tiers);
    let report = ctl.tick(&inhibit, &mut hw, &mut link, &mut sink);
    assert!(!report.pump_on);
    assert!(report.demand);
    assert_eq!(report.status, StatusNote::Inhibited { display_secs: 40 });

    // The in-use task counts the inhibit down once per second.
    for _ in 0..30 {
        inhibit.tick_second();
    }
    let report = ctl.tick(&inhibit, &mut hw, &mut link, &mut sink);
    assert!(report.pump_on);
    assert_eq!(report.status, StatusNote::None);
    assert_eq!(hw.relay_history(), vec![true, false, true]);
}

#[test]
fn inhibit_overrides_forced_run() {
    let mut ctl = PumpController::new(&PumpConfig::default());
    let inhibit = InhibitManager::new();
    inhibit.set(5);
    let mut hw = MockHardware::new(30.0, 30.0);
    let report = ctl.tick(&inhibit, &mut hw, &mut MockLink::new(), &mut RecordingSink::new());
    assert!(!report.pump_on);
    assert_eq!(report.status, StatusNote::Inhibited { display_secs: 10 });
}

#[test]
fn stall_drop_reported_once_per_start() {
    let mut ctl = PumpController::new(&no_boot_run());
    let inhibit = InhibitManager::new();
    let mut readings = vec![(50.0, 40.0)];
    readings.extend(std::iter::repeat_n((50.0, 39.2), 14));
    let mut hw = MockHardware::scripted(&readings);
    let mut link = MockLink::new();
    let mut sink = RecordingSink::new();

    let reports: Vec<Option<f32>> = (0..15)
        .map(|_| ctl.tick(&inhibit, &mut hw, &mut link, &mut sink).stall_report)
        .collect();

    let reported: Vec<(usize, f32)> = reports
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.map(|v| (i + 1, v)))
        .collect();
    assert_eq!(reported.len(), 1);
    let (tick, value) = reported[0];
    assert_eq!(tick, 12, "window of 120 s closes on the 12th tick");
    assert!((value - 12.8).abs() < 1e-3, "got {value}");

    let drops = link.published_on(TelemetryChannel::ReturnDrop);
    assert_eq!(drops.len(), 1);
    assert!((drops[0] - 12.8).abs() < 1e-3);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::StallReported(_))), 1);
}

#[test]
fn unknown_supply_holds_previous_decision() {
    let mut ctl = PumpController::new(&no_boot_run());
    let inhibit = InhibitManager::new();
    let mut hw = MockHardware::scripted(&[
        (48.0, 38.0),
        (UNKNOWN_CELSIUS, 38.0),
        (40.0, 38.0),
        (UNKNOWN_CELSIUS, 38.0),
    ]);
    let decisions = run_ticks(
        &mut ctl,
        &inhibit,
        &mut hw,
        &mut MockLink::new(),
        &mut RecordingSink::new(),
        4,
    );
    assert_eq!(decisions, vec![true, true, false, false]);
}

#[test]
fn inhibit_ending_inside_band_keeps_pump_off() {
    let mut ctl = PumpController::new(&no_boot_run());
    let inhibit = InhibitManager::new();
    let mut hw = MockHardware::scripted(&[(48.0, 35.0), (45.0, 35.0)]);
    let mut link = MockLink::new();
    let mut sink = RecordingSink::new();

    assert!(ctl.tick(&inhibit, &mut hw, &mut link, &mut sink).pump_on);
    inhibit.set(30);
    assert!(!ctl.tick(&inhibit, &mut hw, &mut link, &mut sink).pump_on);
    inhibit.set(0);
    let decisions = run_ticks(&mut ctl, &inhibit, &mut hw, &mut link, &mut sink, 3);
    assert_eq!(decisions, vec![false, false, false]);
    assert_eq!(hw.relay_history(), vec![true, false, false, false, false]);
}

#[test]
fn forced_run_ending_inside_band_keeps_pump_on() {
    let cfg = PumpConfig::default();
    let mut ctl = PumpController::new(&cfg);
    let inhibit = InhibitManager::new();
    let mut hw = MockHardware::scripted(&[(42.0, 35.0), (45.0, 35.0)]);
    let mut link = MockLink::new();
    let mut sink = RecordingSink::new();

    let ticks = (cfg.run_secs / cfg.beat_secs) as usize;
    let decisions = run_ticks(&mut ctl, &inhibit, &mut hw, &mut link, &mut sink, ticks + 3);
    assert!(decisions.iter().all(|&on| on), "{decisions:?}");
    assert_eq!(sink.count(|e| matches!(e, AppEvent::PumpSwitched { .. })), 1);

    // Leaving the band downwards still stops it.
    hw.set(41.0, 35.0);
    assert!(!ctl.tick(&inhibit, &mut hw, &mut link, &mut sink).pump_on);
}

#[test]
fn unknown_return_is_not_shown_as_temperature() {
    let mut ctl = PumpController::new(&no_boot_run());
    let inhibit = InhibitManager::new();
    let mut hw = MockHardware::scripted(&[(50.0, UNKNOWN_CELSIUS), (50.0, 38.04)]);
    let mut link = MockLink::new();
    let mut sink = RecordingSink::new();

    ctl.tick(&inhibit, &mut hw, &mut link, &mut sink);
    assert!(link.notifications.is_empty());

    ctl.tick(&inhibit, &mut hw, &mut link, &mut sink);
    assert_eq!(link.notifications, vec![Notification::Temperature(38.0)]);
}

#[test]
fn saturated_publisher_never_changes_decisions() {
    let readings = [(42.0, 35.0), (48.0, 35.0), (44.0, 35.0), (41.0, 35.0)];

    let decide = |mut link: MockLink| {
        let mut ctl = PumpController::new(&no_boot_run());
        let mut hw = MockHardware::scripted(&readings);
        let mut sink = RecordingSink::new();
        let decisions = run_ticks(&mut ctl, &InhibitManager::new(), &mut hw, &mut link, &mut sink, 4);
        (decisions, sink)
    };

    let (healthy, _) = decide(MockLink::new());
    let (saturated, sink) = decide(MockLink::saturated());
    assert_eq!(healthy, saturated);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::PublishFailed { .. })), 8);
}
