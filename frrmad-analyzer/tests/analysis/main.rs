//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

mod orchestrator;
mod router;

use std::path::PathBuf;

use chrono::Utc;
use frrmad_analyzer::advertisement::Advertisement;
use frrmad_analyzer::anomaly::AnomalyDetection;
use frrmad_utils::snapshot::FrrSnapshot;
use serde::de::DeserializeOwned;

//
// Helper functions.
//

fn fixture_path(router: &str, file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(router)
        .join(file)
}

fn load_fixture<T: DeserializeOwned>(router: &str, file: &str) -> T {
    try_load_fixture(router, file)
        .unwrap_or_else(|| panic!("missing fixture {router}/{file}"))
}

fn try_load_fixture<T: DeserializeOwned>(
    router: &str,
    file: &str,
) -> Option<T> {
    let path = fixture_path(router, file);
    let data = std::fs::read_to_string(&path).ok()?;
    let value = serde_json::from_str(&data).unwrap_or_else(|error| {
        panic!("failed to decode {}: {}", path.display(), error)
    });
    Some(value)
}

// Builds a snapshot out of every fixture available for the given router.
fn load_snapshot(router: &str) -> FrrSnapshot {
    let mut snapshot = FrrSnapshot::new(Utc::now());
    snapshot.static_config = try_load_fixture(router, "config.json");
    snapshot.ospf_router = try_load_fixture(router, "router.json");
    snapshot.ospf_external = try_load_fixture(router, "external.json");
    snapshot.ospf_nssa_external =
        try_load_fixture(router, "nssa_external.json");
    snapshot.ospf_neighbors = try_load_fixture(router, "neighbors.json");
    snapshot.rib = try_load_fixture(router, "rib.json");
    snapshot
}

fn keys(advs: &[Advertisement]) -> Vec<String> {
    advs.iter().map(|adv| adv.key()).collect()
}

fn prefix_keys(advs: &[Advertisement]) -> Vec<String> {
    advs.iter().map(|adv| adv.prefix_key()).collect()
}

fn assert_no_anomalies(result: &AnomalyDetection) {
    assert!(!result.has_over_advertised_prefixes, "{result:?}");
    assert!(!result.has_under_advertised_prefixes, "{result:?}");
    assert!(!result.has_duplicate_prefixes, "{result:?}");
    assert!(result.missing_entries.is_empty());
    assert!(result.superfluous_entries.is_empty());
    assert!(result.duplicate_entries.is_empty());
}
