//! Persisted settings adapter.
//!
//! Implements [`ConfigPort`] on top of NVS:
//!
//! | key          | content                                         |
//! |--------------|-------------------------------------------------|
//! | `ota_string` | `host;user;password;base_index;ping_target`     |
//! | `pumpcfg`    | postcard-encoded [`PumpConfig`]                 |
//! | `wifi_ssid`  | station SSID                                    |
//! | `wifi_pass`  | station password                                |
//!
//! On ESP-IDF the values live in the `pumpswitch` namespace of the
//! default NVS partition; elsewhere in an in-memory map.

use log::{info, warn};

use crate::app::ports::ConfigPort;
use crate::config::{PumpConfig, RemoteSettings};
use crate::error::{Error, Result};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};

pub const NAMESPACE: &str = "pumpswitch";
pub const KEY_REMOTE: &str = "ota_string";
pub const KEY_CONFIG: &str = "pumpcfg";
pub const KEY_WIFI_SSID: &str = "wifi_ssid";
pub const KEY_WIFI_PASS: &str = "wifi_pass";

const MAX_VALUE_LEN: usize = 256;

pub struct SettingsStore {
    #[cfg(target_os = "espidf")]
    nvs: EspNvs<NvsDefault>,
    #[cfg(not(target_os = "espidf"))]
    store: HashMap<&'static str, Vec<u8>>,
}

impl SettingsStore {
    #[cfg(target_os = "espidf")]
    pub fn open(partition: EspDefaultNvsPartition) -> Result<Self> {
        let nvs = EspNvs::new(partition, NAMESPACE, true).map_err(|_| Error::Init("nvs namespace"))?;
        info!("Settings: NVS namespace '{}' open", NAMESPACE);
        Ok(Self { nvs })
    }

    /// Empty in-memory store.
    #[cfg(not(target_os = "espidf"))]
    pub fn in_memory() -> Self {
        info!("Settings: in-memory backend");
        Self {
            store: HashMap::new(),
        }
    }

    // ── Raw access ────────────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn read(&self, key: &str) -> Option<Vec<u8>> {
        let mut buf = [0u8; MAX_VALUE_LEN];
        match self.nvs.get_raw(key, &mut buf) {
            Ok(value) => value.map(<[u8]>::to_vec),
            Err(e) => {
                warn!("Settings: read '{}' failed ({})", key, e);
                None
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn read(&self, key: &str) -> Option<Vec<u8>> {
        self.store.get(key).cloned()
    }

    #[cfg(target_os = "espidf")]
    fn write(&mut self, key: &'static str, value: &[u8]) -> Result<()> {
        self.nvs
            .set_raw(key, value)
            .map(|_| ())
            .map_err(|_| Error::Config("nvs write failed"))
    }

    #[cfg(not(target_os = "espidf"))]
    fn write(&mut self, key: &'static str, value: &[u8]) -> Result<()> {
        self.store.insert(key, value.to_vec());
        Ok(())
    }

    fn read_string(&self, key: &str) -> Option<String> {
        let bytes = self.read(key)?;
        match String::from_utf8(bytes) {
            Ok(s) => Some(s.trim_end_matches('\0').to_owned()),
            Err(_) => {
                warn!("Settings: '{}' is not UTF-8, ignored", key);
                None
            }
        }
    }

    /// Store a string setting (provisioning).
    pub fn set_string(&mut self, key: &'static str, value: &str) -> Result<()> {
        if value.len() > MAX_VALUE_LEN {
            return Err(Error::Config("setting too long"));
        }
        self.write(key, value.as_bytes())
    }

    /// Station credentials, if provisioned.
    pub fn wifi_credentials(&self) -> Option<(String, String)> {
        let ssid = self.read_string(KEY_WIFI_SSID)?;
        let password = self.read_string(KEY_WIFI_PASS).unwrap_or_default();
        Some((ssid, password))
    }
}

impl ConfigPort for SettingsStore {
    fn load_config(&self) -> Result<PumpConfig> {
        let Some(bytes) = self.read(KEY_CONFIG) else {
            info!("Settings: no stored config, using defaults");
            return Ok(PumpConfig::default());
        };
        let config: PumpConfig =
            postcard::from_bytes(&bytes).map_err(|_| Error::Config("stored config corrupted"))?;
        config.validate()?;
        info!("Settings: config loaded ({} bytes)", bytes.len());
        Ok(config)
    }

    fn save_config(&mut self, config: &PumpConfig) -> Result<()> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| Error::Config("config encoding failed"))?;
        self.write(KEY_CONFIG, &bytes)?;
        info!("Settings: config saved ({} bytes)", bytes.len());
        Ok(())
    }

    fn load_remote(&self) -> RemoteSettings {
        match self.read_string(KEY_REMOTE) {
            Some(raw) => RemoteSettings::parse(&raw),
            None => {
                warn!("Settings: no '{}', remote features use placeholders", KEY_REMOTE);
                RemoteSettings::default()
            }
        }
    }
}
