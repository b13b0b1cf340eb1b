//! Fuzz target: `FirmwareConfig` from JSON
//!
//! Arbitrary bytes are parsed as a config.  Any config that passes
//! `validate()` must produce a legal advertising payload.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use smartzipper::adapters::ble::{ADV_PAYLOAD_MAX, build_adv_payload};
use smartzipper::app::ports::AdvertisingParams;
use smartzipper::config::FirmwareConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<FirmwareConfig>(data) else {
        return;
    };
    if config.validate().is_err() {
        return;
    }
    let params = AdvertisingParams {
        name: config.device_name.as_str(),
        interval_min: config.adv_interval_min,
        interval_max: config.adv_interval_max,
        connectable: true,
        discoverable: true,
    };
    let payload = build_adv_payload(&params).expect("valid config must fit the advertising payload");
    assert!(payload.len() <= ADV_PAYLOAD_MAX);
    assert!(params.interval_min <= params.interval_max);
});
