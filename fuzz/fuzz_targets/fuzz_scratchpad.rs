//! Fuzz target: DS18B20 scratchpad decoding
//!
//! Feeds arbitrary 9-byte scratchpads. Verifies:
//! - A pad is accepted only when its CRC byte matches
//! - Accepted readings stay inside the 16-bit sensor range
//!
//! cargo fuzz run fuzz_scratchpad

#![no_main]

use libfuzzer_sys::fuzz_target;
use pumpswitch::drivers::onewire::{crc8, decode_scratchpad};

fuzz_target!(|pad: [u8; 9]| {
    let decoded = decode_scratchpad(&pad);
    assert_eq!(decoded.is_some(), crc8(&pad[..8]) == pad[8]);

    if let Some(celsius) = decoded {
        assert!(celsius.is_finite());
        assert!((-2048.0..2048.0).contains(&celsius), "out of range: {celsius}");
    }
});
