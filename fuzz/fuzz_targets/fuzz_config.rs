//! Fuzz target for analytics.json parsing and validation.

#![no_main]

use bia_config::{validate_config, AnalyticsConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = AnalyticsConfig::from_json(text) {
        let _ = validate_config(&config);
    }
});
