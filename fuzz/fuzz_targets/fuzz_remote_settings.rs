//! Fuzz target: `RemoteSettings::parse`
//!
//! The provisioning string comes straight out of NVS. Verifies:
//! - No panics on arbitrary UTF-8
//! - No field is ever empty (missing ones become the placeholder)
//!
//! cargo fuzz run fuzz_remote_settings

#![no_main]

use libfuzzer_sys::fuzz_target;
use pumpswitch::config::{MISSING_FIELD, RemoteSettings};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = core::str::from_utf8(data) else {
        return;
    };
    let settings = RemoteSettings::parse(raw);

    for field in [
        &settings.mqtt_host,
        &settings.mqtt_user,
        &settings.mqtt_password,
        &settings.ping_target,
    ] {
        assert!(!field.is_empty(), "empty field parsed from {raw:?}");
    }
    if settings.mqtt_host == MISSING_FIELD {
        assert_eq!(settings.mqtt_url(), format!("mqtt://{MISSING_FIELD}"));
    }
});
