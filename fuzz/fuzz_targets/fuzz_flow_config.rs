//! Fuzz target for flow.json configuration parsing.
//!
//! Parsing and semantic validation must return errors, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pf_config::validate::validate_flow_config;
use pf_config::FlowConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = serde_json::from_slice::<FlowConfig>(data) {
        let _ = validate_flow_config(&config);
    }
});
