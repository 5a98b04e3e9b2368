//! DS18B20 probes on the one-wire bus.
//!
//! Each scan broadcasts a conversion to every probe (SKIP ROM), waits the
//! 12-bit conversion time, then reads each probe's scratchpad by ROM
//! code.  A scratchpad that fails its CRC is reported as NaN, which the
//! [`ProbeBank`](crate::sensors::probe_bank::ProbeBank) stores as unknown.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: the RMT-backed `OWDriver` from esp-idf-hal.
//! On host: only the scratchpad decoding is compiled, for tests.

const SCRATCHPAD_LEN: usize = 9;

/// 12-bit conversion time.
pub const CONVERSION_MS: u32 = 750;

const CMD_SKIP_ROM: u8 = 0xCC;
const CMD_MATCH_ROM: u8 = 0x55;
const CMD_CONVERT_T: u8 = 0x44;
const CMD_READ_SCRATCHPAD: u8 = 0xBE;

/// Dallas/Maxim CRC-8 (polynomial x^8 + x^5 + x^4 + 1, reflected).
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut b = byte;
        for _ in 0..8 {
            let mix = (crc ^ b) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            b >>= 1;
        }
    }
    crc
}

/// Temperature from a scratchpad, or `None` on CRC mismatch.
pub fn decode_scratchpad(pad: &[u8; SCRATCHPAD_LEN]) -> Option<f32> {
    if crc8(&pad[..8]) != pad[8] {
        return None;
    }
    let raw = i16::from_le_bytes([pad[0], pad[1]]);
    Some(f32::from(raw) / 16.0)
}

#[cfg(target_os = "espidf")]
pub use esp::OneWireProbes;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::onewire::{OWAddress, OWDriver};
    use esp_idf_svc::sys::EspError;
    use log::{info, warn};

    use super::*;

    pub struct OneWireProbes {
        bus: OWDriver<'static>,
        roms: Vec<OWAddress>,
    }

    impl OneWireProbes {
        pub fn new(bus: OWDriver<'static>) -> Self {
            Self {
                bus,
                roms: Vec::new(),
            }
        }

        /// Enumerate the bus.  Returns the number of probes found.
        pub fn discover(&mut self) -> Result<usize, EspError> {
            self.roms.clear();
            for found in self.bus.search()? {
                match found {
                    Ok(addr) => {
                        info!("OneWire: probe {:016X}", addr.address());
                        self.roms.push(addr);
                    }
                    Err(e) => warn!("OneWire: search error ({})", e),
                }
            }
            Ok(self.roms.len())
        }

        /// Convert and read every discovered probe.
        pub fn scan(&mut self) -> Result<Vec<(u64, f32)>, EspError> {
            self.bus.reset()?;
            self.bus.write(&[CMD_SKIP_ROM, CMD_CONVERT_T])?;
            FreeRtos::delay_ms(CONVERSION_MS);

            let mut readings = Vec::with_capacity(self.roms.len());
            for addr in &self.roms {
                let celsius = self.read_probe(addr).unwrap_or_else(|| {
                    warn!("OneWire: probe {:016X} read failed", addr.address());
                    f32::NAN
                });
                readings.push((addr.address(), celsius));
            }
            Ok(readings)
        }

        fn read_probe(&self, addr: &OWAddress) -> Option<f32> {
            let mut cmd = [0u8; 10];
            cmd[0] = CMD_MATCH_ROM;
            cmd[1..9].copy_from_slice(&addr.address().to_le_bytes());
            cmd[9] = CMD_READ_SCRATCHPAD;
            self.bus.reset().ok()?;
            self.bus.write(&cmd).ok()?;
            let mut pad = [0u8; SCRATCHPAD_LEN];
            self.bus.read(&mut pad).ok()?;
            decode_scratchpad(&pad)
        }
    }
}
