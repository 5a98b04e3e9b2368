//! Accessory pause → in-use bridge → cooldown inhibit → control loop.

use pumpswitch::app::SharedState;
use pumpswitch::app::accessory::CharacteristicValue;
use pumpswitch::app::events::{AppEvent, StatusNote};
use pumpswitch::app::in_use::{InUseBridge, InUsePhase};
use pumpswitch::app::service::PumpController;
use pumpswitch::config::PumpConfig;
use pumpswitch::error::CharacteristicError;

use crate::mock_hw::{MockHardware, MockLink, Notification, RecordingSink};

/// One pass of the in-use task: the inhibit decrement, then the bridge.
fn in_use_second(bridge: &mut InUseBridge, shared: &SharedState, link: &mut MockLink, sink: &mut RecordingSink) -> InUsePhase {
    shared.inhibit.tick_second();
    bridge.tick(&shared.accessory, &shared.inhibit, link, sink)
}

#[test]
fn idle_while_active() {
    let shared = SharedState::new();
    let mut bridge = InUseBridge::from_config(&PumpConfig::default());
    let mut link = MockLink::new();
    let mut sink = RecordingSink::new();
    for _ in 0..5 {
        assert_eq!(in_use_second(&mut bridge, &shared, &mut link, &mut sink), InUsePhase::Idle);
    }
    assert!(link.notifications.is_empty());
    assert!(!shared.inhibit.is_active());
}

#[test]
fn pause_restores_with_cooldown() {
    let cfg = PumpConfig::default();
    let shared = SharedState::new();
    let mut bridge = InUseBridge::from_config(&cfg);
    let mut link = MockLink::new();
    let mut sink = RecordingSink::new();

    shared
        .accessory
        .write_active(CharacteristicValue::Uint8(0))
        .unwrap();
    assert!(!shared.accessory.active());

    let phase = in_use_second(&mut bridge, &shared, &mut link, &mut sink);
    assert_eq!(phase, InUsePhase::Settling { remaining_secs: 1 });
    assert!(!shared.accessory.in_use());
    assert_eq!(link.notifications, vec![Notification::InUse(false)]);

    let phase = bridge.tick(&shared.accessory, &shared.inhibit, &mut link, &mut sink);
    assert_eq!(phase, InUsePhase::Idle);
    assert!(shared.accessory.active());
    assert!(shared.accessory.in_use());
    assert_eq!(shared.inhibit.remaining(), cfg.stop_for_secs);
    assert_eq!(
        link.notifications,
        vec![
            Notification::InUse(false),
            Notification::InUse(true),
            Notification::Active(true),
        ]
    );
    assert_eq!(
        sink.events,
        vec![
            AppEvent::InUseDropped,
            AppEvent::InUseRestored {
                cooldown_secs: cfg.stop_for_secs
            },
        ]
    );
}

#[test]
fn zero_settle_restores_in_the_same_second() {
    let shared = SharedState::new();
    let mut bridge = InUseBridge::new(0, 60);
    let mut link = MockLink::new();
    let mut sink = RecordingSink::new();

    shared.accessory.set_active(false);
    let phase = bridge.tick(&shared.accessory, &shared.inhibit, &mut link, &mut sink);
    assert_eq!(phase, InUsePhase::Idle);
    assert!(shared.accessory.active());
    assert_eq!(shared.inhibit.remaining(), 60);
}

#[test]
fn cooldown_keeps_hot_loop_off() {
    let cfg = PumpConfig {
        run_on_boot: false,
        ..PumpConfig::default()
    };
    let shared = SharedState::new();
    let mut bridge = InUseBridge::from_config(&cfg);
    let mut ctl = PumpController::new(&cfg);
    let mut hw = MockHardware::new(50.0, 40.0);
    let mut link = MockLink::new();
    let mut sink = RecordingSink::new();

    assert!(ctl.tick(&shared.inhibit, &mut hw, &mut link, &mut sink).pump_on);

    shared.accessory.set_active(false);
    in_use_second(&mut bridge, &shared, &mut link, &mut sink);
    in_use_second(&mut bridge, &shared, &mut link, &mut sink);
    assert_eq!(shared.inhibit.remaining(), cfg.stop_for_secs);

    let report = ctl.tick(&shared.inhibit, &mut hw, &mut link, &mut sink);
    assert!(!report.pump_on);
    assert_eq!(
        report.status,
        StatusNote::Inhibited {
            display_secs: cfg.stop_for_secs + cfg.beat_secs
        }
    );

    for _ in 0..cfg.stop_for_secs {
        in_use_second(&mut bridge, &shared, &mut link, &mut sink);
    }
    assert!(ctl.tick(&shared.inhibit, &mut hw, &mut link, &mut sink).pump_on);
}

#[test]
fn restore_pass_leaves_full_cooldown() {
    let cfg = PumpConfig::default();
    let shared = SharedState::new();
    let mut bridge = InUseBridge::from_config(&cfg);
    let mut link = MockLink::new();
    let mut sink = RecordingSink::new();

    shared.accessory.set_active(false);
    in_use_second(&mut bridge, &shared, &mut link, &mut sink);
    assert_eq!(in_use_second(&mut bridge, &shared, &mut link, &mut sink), InUsePhase::Idle);
    assert_eq!(shared.inhibit.remaining(), cfg.stop_for_secs);

    // The first decrement comes one second after the restore.
    in_use_second(&mut bridge, &shared, &mut link, &mut sink);
    assert_eq!(shared.inhibit.remaining(), cfg.stop_for_secs - 1);
}

#[test]
fn characteristic_writes_are_checked() {
    let shared = SharedState::new();
    assert_eq!(
        shared.accessory.write_active(CharacteristicValue::Float(0.0)),
        Err(CharacteristicError::InvalidFormat)
    );
    assert!(shared.accessory.active());
    assert_eq!(
        shared.accessory.write_in_use(CharacteristicValue::Uint8(0)),
        Err(CharacteristicError::ReadOnly)
    );
    assert!(shared.accessory.in_use());
    assert_eq!(shared.accessory.read_active(), CharacteristicValue::Uint8(1));
}
