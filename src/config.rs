//! System configuration parameters
//!
//! All tunable parameters for the pump switch.  Values can be overridden
//! from persisted settings (see [`crate::adapters::settings`]).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Core control configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PumpConfig {
    // --- Hysteresis ---
    /// Supply temperature around which the pump is switched (Celsius)
    pub setpoint_c: f32,
    /// Full dead-band width (Celsius); the band is setpoint ± hysteresis/2
    pub hysteresis_c: f32,

    // --- Timing ---
    /// Control tick length (seconds)
    pub beat_secs: u32,
    /// Forced-run duration and continuous-run threshold (seconds)
    pub run_secs: u32,
    /// Forced-run repeat period (seconds)
    pub repeat_secs: u32,
    /// Start with a forced run right after boot
    pub run_on_boot: bool,

    // --- Inhibit ---
    /// Cooldown applied after the accessory was paused (seconds)
    pub stop_for_secs: u32,
    /// Single tap on the button (seconds)
    pub short_press_inhibit_secs: u32,
    /// Double tap on the button (seconds)
    pub double_press_inhibit_secs: u32,
    /// Long press on the button (seconds)
    pub long_press_inhibit_secs: u32,
    /// Delay between dropping and restoring "in use" (seconds)
    pub settle_secs: u32,

    // --- Stall reporting ---
    /// Return-line observation window after the pump starts (seconds)
    pub stall_window_secs: u32,
    /// Largest drop that is still resolved (Celsius)
    pub max_drop_c: f32,
    /// Zoom factor applied to the reported drop
    pub drop_scale: f32,

    // --- Probes ---
    /// One-wire ROM code of the supply-line probe
    pub supply_probe: u64,
    /// One-wire ROM code of the return-line probe
    pub return_probe: u64,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            // Hysteresis
            setpoint_c: 45.0,
            hysteresis_c: 4.0,

            // Timing
            beat_secs: 10,
            run_secs: 120,     // 12 beats
            repeat_secs: 3600, // 1 hour
            run_on_boot: true,

            // Inhibit
            stop_for_secs: 180,
            short_press_inhibit_secs: 900,
            double_press_inhibit_secs: 3600,
            long_press_inhibit_secs: 5,
            settle_secs: 1,

            // Stall reporting
            stall_window_secs: 120,
            max_drop_c: 1.0,
            drop_scale: 16.0, // probes resolve 1/16 °C

            // Probes (bound at provisioning time)
            supply_probe: 0,
            return_probe: 0,
        }
    }
}

impl PumpConfig {
    /// Check every field against its allowed range.
    ///
    /// Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<()> {
        if self.hysteresis_c.is_nan() || self.hysteresis_c <= 0.0 {
            return Err(Error::Config("hysteresis must be positive"));
        }
        if !self.setpoint_c.is_finite() {
            return Err(Error::Config("setpoint must be finite"));
        }
        if self.beat_secs == 0 {
            return Err(Error::Config("beat must be at least one second"));
        }
        if self.run_secs == 0 || self.run_secs % self.beat_secs != 0 {
            return Err(Error::Config("run must be a non-zero multiple of beat"));
        }
        if self.run_secs >= self.repeat_secs {
            return Err(Error::Config("run must be shorter than repeat"));
        }
        if self.stop_for_secs % self.beat_secs != 0 {
            return Err(Error::Config("stop_for must be a multiple of beat"));
        }
        if self.stall_window_secs == 0 || self.stall_window_secs % self.beat_secs != 0 {
            return Err(Error::Config("stall window must be a non-zero multiple of beat"));
        }
        if !positive(self.max_drop_c) || !positive(self.drop_scale) {
            return Err(Error::Config("drop clamp and scale must be positive"));
        }
        Ok(())
    }

    /// Temperature above which the pump is demanded.
    pub fn upper_threshold(&self) -> f32 {
        self.setpoint_c + self.hysteresis_c / 2.0
    }

    /// Temperature below which the demand is dropped.
    pub fn lower_threshold(&self) -> f32 {
        self.setpoint_c - self.hysteresis_c / 2.0
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

// ---------------------------------------------------------------------------
// Remote settings (persisted as a single `;`-separated string)
// ---------------------------------------------------------------------------

/// Placeholder stored for any missing remote field.
pub const MISSING_FIELD: &str = "error";

/// Telemetry base index used when none is provisioned.
pub const DEFAULT_BASE_INDEX: u32 = 1000;

/// Broker credentials, telemetry index and ping target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
    pub mqtt_host: String,
    pub mqtt_user: String,
    pub mqtt_password: String,
    /// Base index of the home-automation devices the values are filed under.
    pub base_index: u32,
    /// Host pinged by the reachability watchdog.
    pub ping_target: String,
}

impl RemoteSettings {
    /// Parse `host;user;password;base_index;ping_target`.
    ///
    /// Every missing field becomes [`MISSING_FIELD`]; a missing or
    /// unparsable base index becomes [`DEFAULT_BASE_INDEX`].
    pub fn parse(raw: &str) -> Self {
        let mut fields = raw.split(';').map(str::trim);
        let mut next = || {
            fields
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or(MISSING_FIELD)
                .to_owned()
        };
        let mqtt_host = next();
        let mqtt_user = next();
        let mqtt_password = next();
        let base_index = next().parse().unwrap_or(DEFAULT_BASE_INDEX);
        let ping_target = next();
        Self {
            mqtt_host,
            mqtt_user,
            mqtt_password,
            base_index,
            ping_target,
        }
    }

    /// Broker URL for the MQTT client.
    pub fn mqtt_url(&self) -> String {
        format!("mqtt://{}", self.mqtt_host)
    }
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self::parse("")
    }
}
