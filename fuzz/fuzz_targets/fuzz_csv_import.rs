//! Fuzz target for CSV series import.
//!
//! Arbitrary text must parse or fail with a line-numbered error, never panic.
//! Whatever parses is run through the summary and trend analyses.

#![no_main]

use bia_core::engine::AnalyticsEngine;
use bia_core::parse_csv;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(series) = parse_csv(text, None) else {
        return;
    };
    let mut engine = AnalyticsEngine::default();
    engine.add_dataset("fuzz", series);
    let _ = engine.statistical_summary("fuzz");
    let _ = engine.analyze_trend("fuzz", 4);
});
