//! WiFi station adapter.
//!
//! The broker and the reachability probe both need the station link, so
//! it is brought up once during boot, before any task starts.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::wifi::BlockingWifi` in STA mode.
//! - **all other targets**: a simulated link that connects immediately.
//!
//! Lost links are left to the reachability watchdog: it restarts the
//! device once the ping budget runs out.

use core::fmt;
use log::{info, warn};

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// Validated station credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl Credentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConnectivityError> {
        if ssid.is_empty() || !is_printable_ascii(ssid) {
            return Err(ConnectivityError::InvalidSsid);
        }
        if !password.is_empty() && password.len() < 8 {
            return Err(ConnectivityError::InvalidPassword);
        }
        let ssid = heapless::String::try_from(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
        let password =
            heapless::String::try_from(password).map_err(|_| ConnectivityError::InvalidPassword)?;
        Ok(Self { ssid, password })
    }

    /// From the stored `(ssid, password)` pair, if any.
    pub fn from_stored(stored: Option<(String, String)>) -> Result<Self, ConnectivityError> {
        let (ssid, password) = stored.ok_or(ConnectivityError::NoCredentials)?;
        Self::new(&ssid, &password)
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

// ───────────────────────────────────────────────────────────────
// Station
// ───────────────────────────────────────────────────────────────

pub struct WifiStation {
    credentials: Credentials,
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    #[cfg(not(target_os = "espidf"))]
    connected: bool,
}

impl WifiStation {
    #[cfg(target_os = "espidf")]
    pub fn new(
        credentials: Credentials,
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
    ) -> Result<Self, ConnectivityError> {
        let driver = EspWifi::new(modem, sysloop.clone(), Some(nvs))
            .map_err(|_| ConnectivityError::ConnectionFailed)?;
        let wifi = BlockingWifi::wrap(driver, sysloop).map_err(|_| ConnectivityError::ConnectionFailed)?;
        Ok(Self { credentials, wifi })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            connected: false,
        }
    }

    pub fn ssid(&self) -> &str {
        self.credentials.ssid()
    }

    /// Join the network and wait for an IP address.
    pub fn connect(&mut self) -> Result<(), ConnectivityError> {
        info!("WiFi: connecting to '{}'", self.credentials.ssid);
        match self.platform_connect() {
            Ok(()) => {
                info!("WiFi: connected to '{}'", self.credentials.ssid);
                Ok(())
            }
            Err(e) => {
                warn!("WiFi: {}", e);
                Err(e)
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        let auth_method = if self.credentials.is_open() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let conf = Configuration::Client(ClientConfiguration {
            ssid: self.credentials.ssid.clone(),
            password: self.credentials.password.clone(),
            auth_method,
            ..Default::default()
        });
        let failed = |_| ConnectivityError::ConnectionFailed;
        self.wifi.set_configuration(&conf).map_err(failed)?;
        self.wifi.start().map_err(failed)?;
        self.wifi.connect().map_err(failed)?;
        self.wifi.wait_netif_up().map_err(failed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        self.connected = true;
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    pub fn is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn is_connected(&self) -> bool {
        self.connected
    }
}
