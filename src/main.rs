//! PumpSwitch firmware entry point.
//!
//! Hexagonal architecture with free-running tasks sharing a small atomic
//! state block.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   SettingsStore   SystemClock  │
//! │  (Sensor+Actuator) (EventSink)    (ConfigPort)    (Clock)      │
//! │  QueuedTelemetry   LogAccessoryNotifier   WifiStation          │
//! │  (TelemetryPort)   (AccessoryPort)                             │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  PumpController · InUseBridge (pure logic)             │    │
//! │  │  Hysteresis · RunTimer · Inhibit · Stall               │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Tasks: probes · state · in-use · button · ping · publish      │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{error, info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::gpio::{AnyIOPin, PinDriver, Pull};
use esp_idf_svc::hal::onewire::OWDriver;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::ping::{self, EspPing};

use pumpswitch::adapters::Outbound;
use pumpswitch::adapters::accessory::LogAccessoryNotifier;
use pumpswitch::adapters::hardware::HardwareAdapter;
use pumpswitch::adapters::log_sink::LogEventSink;
use pumpswitch::adapters::mqtt::{EspMqttSink, QueuedTelemetry, TELEMETRY_QUEUE, run_publisher};
use pumpswitch::adapters::settings::SettingsStore;
use pumpswitch::adapters::time::SystemClock;
use pumpswitch::adapters::wifi::{Credentials, WifiStation};
use pumpswitch::app::SharedState;
use pumpswitch::app::in_use::InUseBridge;
use pumpswitch::app::ports::ConfigPort;
use pumpswitch::app::service::PumpController;
use pumpswitch::config::{PumpConfig, RemoteSettings};
use pumpswitch::control::inhibit::PressTiers;
use pumpswitch::drivers::button::ButtonDriver;
use pumpswitch::drivers::onewire::OneWireProbes;
use pumpswitch::drivers::relay::Relay;
use pumpswitch::drivers::status_led::StatusLed;
use pumpswitch::drivers::task_pin::{Core, TaskSpec, spawn_task};
use pumpswitch::drivers::watchdog::Watchdog;
use pumpswitch::pins;
use pumpswitch::reachability::{ReachabilityWatchdog, Verdict};
use pumpswitch::scheduler::PeriodicTicker;
use pumpswitch::sensors::probe_bank::ProbeBank;

const WATCHDOG_TIMEOUT_MS: u32 = 30_000;
const BUTTON_POLL: Duration = Duration::from_millis(20);
const SECOND: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PumpSwitch v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;
    Watchdog::configure(WATCHDOG_TIMEOUT_MS);

    // ── 2. Settings ───────────────────────────────────────────
    let store = SettingsStore::open(nvs_partition.clone()).context("opening settings")?;
    let config = match store.load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            PumpConfig::default()
        }
    };
    let remote = store.load_remote();
    info!(
        "Config: setpoint {:.1} C ±{:.1}, beat {}s, forced run {}s every {}s",
        config.setpoint_c,
        config.hysteresis_c / 2.0,
        config.beat_secs,
        config.run_secs,
        config.repeat_secs
    );

    // ── 3. Network ────────────────────────────────────────────
    let credentials = Credentials::from_stored(store.wifi_credentials())
        .map_err(|e| anyhow::anyhow!("WiFi credentials: {e}"))?;
    let mut wifi = WifiStation::new(credentials, peripherals.modem, sysloop, nvs_partition)
        .map_err(|e| anyhow::anyhow!("WiFi init: {e}"))?;
    if let Err(e) = wifi.connect() {
        // Control does not depend on the network; the ping task restarts
        // the device if it never comes up.
        warn!("Starting without network: {}", e);
    }

    // ── 4. Shared state ───────────────────────────────────────
    let shared = Arc::new(SharedState::new());
    if config.supply_probe == 0 || config.return_probe == 0 {
        warn!("Probe ROM codes not configured, unbound probes read as unknown");
    }
    let probes = Arc::new(ProbeBank::with_roles(config.supply_probe, config.return_probe));

    // ── 5. Tasks ──────────────────────────────────────────────
    spawn_task(
        TaskSpec { name: "probes\0", core: Core::App, priority: 6, stack_kb: 4 },
        {
            let probes = Arc::clone(&probes);
            move || probe_task(&probes)
        },
    )?;

    spawn_task(
        TaskSpec { name: "state\0", core: Core::App, priority: 5, stack_kb: 8 },
        {
            let shared = Arc::clone(&shared);
            let config = config.clone();
            let base_index = remote.base_index;
            move || state_task(&config, &shared, probes, base_index)
        },
    )?;

    spawn_task(
        TaskSpec { name: "in-use\0", core: Core::App, priority: 4, stack_kb: 4 },
        {
            let shared = Arc::clone(&shared);
            let bridge = InUseBridge::from_config(&config);
            move || in_use_task(bridge, &shared)
        },
    )?;

    spawn_task(
        TaskSpec { name: "button\0", core: Core::App, priority: 3, stack_kb: 4 },
        {
            let shared = Arc::clone(&shared);
            let tiers = PressTiers::from_config(&config);
            move || button_task(&tiers, &shared)
        },
    )?;

    spawn_task(
        TaskSpec { name: "ping\0", core: Core::Pro, priority: 2, stack_kb: 4 },
        {
            let target = remote.ping_target.clone();
            move || ping_task(&target)
        },
    )?;

    spawn_task(
        TaskSpec { name: "publish\0", core: Core::Pro, priority: 2, stack_kb: 6 },
        move || publish_task(&remote),
    )?;

    info!("System ready.");

    // The WiFi driver must outlive every task.
    loop {
        std::thread::sleep(Duration::from_secs(60));
        if !wifi.is_connected() {
            warn!("WiFi: link down");
        }
    }
}

// ── Tasks ─────────────────────────────────────────────────────

fn probe_task(probes: &ProbeBank) {
    // SAFETY: the bus pin is not handed to any other driver.
    let pin = unsafe { AnyIOPin::new(pins::SENSOR_GPIO) };
    let bus = match OWDriver::new(pin) {
        Ok(bus) => bus,
        Err(e) => {
            error!("OneWire: bus init failed ({}), probes stay unknown", e);
            return;
        }
    };
    let mut sensors = OneWireProbes::new(bus);
    match sensors.discover() {
        Ok(n) => info!("OneWire: {} probe(s) on bus", n),
        Err(e) => warn!("OneWire: discovery failed ({})", e),
    }

    let clock = SystemClock::new();
    let mut ticker = PeriodicTicker::start("probes", SECOND * 2, &clock);
    loop {
        match sensors.scan() {
            Ok(readings) => probes.record_scan(&readings),
            Err(e) => warn!("OneWire: scan failed ({})", e),
        }
        ticker.wait(&clock);
    }
}

fn state_task(config: &PumpConfig, shared: &SharedState, probes: Arc<ProbeBank>, base_index: u32) {
    // SAFETY: relay and LED pins are owned by this task only.
    let relay_pin = unsafe { AnyIOPin::new(pins::RELAY_GPIO) };
    let led_pin = unsafe { AnyIOPin::new(pins::LED_GPIO) };
    let (relay_pin, led_pin) = match (PinDriver::output(relay_pin), PinDriver::output(led_pin)) {
        (Ok(r), Ok(l)) => (r, l),
        _ => {
            error!("State: GPIO init failed, control disabled");
            return;
        }
    };
    // Energised at power-up, as the board always has been.
    let mut hw = HardwareAdapter::new(probes, Relay::new(relay_pin, true), StatusLed::new(led_pin, true));
    let mut link = Outbound {
        accessory: LogAccessoryNotifier::new(),
        telemetry: QueuedTelemetry::new(base_index, &TELEMETRY_QUEUE),
    };
    let mut sink = LogEventSink::new();
    let mut controller = PumpController::new(config);

    let watchdog = Watchdog::subscribe_current("state");
    let clock = SystemClock::new();
    let beat = Duration::from_secs(u64::from(config.beat_secs));
    let mut ticker = PeriodicTicker::start("state", beat, &clock);
    loop {
        controller.tick(&shared.inhibit, &mut hw, &mut link, &mut sink);
        watchdog.feed();
        ticker.wait(&clock);
    }
}

fn in_use_task(mut bridge: InUseBridge, shared: &SharedState) {
    let mut notifier = LogAccessoryNotifier::new();
    let mut sink = LogEventSink::new();
    let watchdog = Watchdog::subscribe_current("in-use");
    let clock = SystemClock::new();
    let mut ticker = PeriodicTicker::start("in-use", SECOND, &clock);
    loop {
        // Count down first: a cooldown set by this pass runs in full.
        shared.inhibit.tick_second();
        bridge.tick(&shared.accessory, &shared.inhibit, &mut notifier, &mut sink);
        watchdog.feed();
        ticker.wait(&clock);
    }
}

fn button_task(tiers: &PressTiers, shared: &SharedState) {
    // SAFETY: the button pin is owned by this task only.
    let pin = unsafe { AnyIOPin::new(pins::BUTTON_GPIO) };
    let mut input = match PinDriver::input(pin) {
        Ok(p) => p,
        Err(e) => {
            error!("Button: GPIO init failed ({})", e);
            return;
        }
    };
    if let Err(e) = input.set_pull(Pull::Up) {
        warn!("Button: pull-up not set ({})", e);
    }
    let mut button = ButtonDriver::new(input);

    let clock = SystemClock::new();
    let mut ticker = PeriodicTicker::start("button", BUTTON_POLL, &clock);
    loop {
        if let Some(kind) = button.tick(clock.uptime_ms()) {
            shared.inhibit.apply_press(kind, tiers);
        }
        ticker.wait(&clock);
    }
}

fn ping_task(target: &str) {
    let Ok(addr) = target.parse::<std::net::Ipv4Addr>() else {
        warn!("Ping: '{}' is not an IPv4 address, reachability check disabled", target);
        return;
    };
    let mut pinger = EspPing::default();
    let conf = ping::Configuration {
        count: 1,
        ..Default::default()
    };
    let mut reachability = ReachabilityWatchdog::default();
    loop {
        let reachable = pinger
            .ping(addr, &conf)
            .map(|summary| summary.received > 0)
            .unwrap_or(false);
        match reachability.record(reachable) {
            Verdict::Continue { next_delay } => std::thread::sleep(next_delay),
            // SAFETY: esp_restart takes no arguments and does not return.
            Verdict::Restart => unsafe { esp_idf_svc::sys::esp_restart() },
        }
    }
}

fn publish_task(remote: &RemoteSettings) {
    match EspMqttSink::connect(remote) {
        Ok(sink) => run_publisher(&TELEMETRY_QUEUE, sink),
        Err(e) => error!("MQTT: {}, telemetry disabled", e),
    }
}
