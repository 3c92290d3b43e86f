//! Fuzz target for replay file parsing.
//!
//! Replay files come from external simulators; loading and replaying one
//! must never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pf_core::model::ReplayFile;
use pf_core::{generate_flows, ReplayModel};

fuzz_target!(|data: &[u8]| {
    let Ok(file) = serde_json::from_slice::<ReplayFile>(data) else {
        return;
    };
    let Ok(mut model) = ReplayModel::from_snapshots(file.snapshots) else {
        return;
    };
    let times = model.snapshot_times();
    for asset in model.assets() {
        let _ = generate_flows(&mut model, &asset, &times, &[0.0, 1.0]);
    }
});
