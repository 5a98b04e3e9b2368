//! Fuzz target: persisted `PumpConfig`
//!
//! Decodes arbitrary bytes the way the settings store does on boot.
//! Verifies:
//! - postcard decoding never panics
//! - Any config that validates keeps the timing invariants the
//!   controller relies on
//!
//! cargo fuzz run fuzz_stored_config

#![no_main]

use libfuzzer_sys::fuzz_target;
use pumpswitch::config::PumpConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = postcard::from_bytes::<PumpConfig>(data) else {
        return;
    };
    if config.validate().is_err() {
        return;
    }

    assert!(config.beat_secs > 0);
    assert_eq!(config.run_secs % config.beat_secs, 0);
    assert!(config.run_secs <= config.repeat_secs);
    assert!(config.upper_threshold() >= config.lower_threshold());
});
