//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::Arc;

use frrmad_analyzer::analyzer::Analyzer;
use frrmad_analyzer::anomaly::AnomalyDetection;
use frrmad_utils::ospf::ExternalLsa;
use frrmad_utils::snapshot::FrrSnapshot;

use crate::{assert_no_anomalies, keys, load_snapshot, prefix_keys};

//
// Helper functions.
//

// r101 snapshot advertising an unexpected AS-external prefix.
fn r101_extra_external() -> FrrSnapshot {
    let mut snapshot = load_snapshot("r101");
    if let Some(external) = &mut snapshot.ospf_external {
        external.as_external_link_states.insert(
            "172.16.9.0".to_owned(),
            ExternalLsa {
                link_state_id: "172.16.9.0".to_owned(),
                network_mask: 24,
                ..Default::default()
            },
        );
    }
    snapshot
}

//
// Tests.
//

#[test]
fn test_analyze_r101() {
    let analyzer = Analyzer::new();
    analyzer.analyze(&load_snapshot("r101"));

    let analysis = analyzer.analysis();
    assert_no_anomalies(&analysis.router_anomaly);
    // OSPF interface prefixes are expected as AS-external too, but r101
    // only originates its static route.
    let external = &analysis.external_anomaly;
    assert!(external.has_under_advertised_prefixes);
    assert!(!external.has_over_advertised_prefixes);
    assert_eq!(external.missing_entries.len(), 10);
    assert_eq!(analysis.nssa_external_anomaly, AnomalyDetection::default());
    assert_no_anomalies(&analysis.lsdb_to_rib_anomaly);

    let rib_to_fib = &analysis.rib_to_fib_anomaly;
    assert!(rib_to_fib.has_under_advertised_prefixes);
    assert!(!rib_to_fib.has_over_advertised_prefixes);
    assert_eq!(keys(&rib_to_fib.missing_entries), vec!["10.1.1.0"]);

    let parsed = analyzer.parsed_data();
    assert_eq!(
        parsed.should_router_lsdb.as_ref().map(|lsdb| lsdb.link_count()),
        Some(10)
    );
    assert!(parsed.should_external_lsdb.is_some());
    assert!(parsed.should_nssa_external_lsdb.is_none());
    assert_eq!(
        parsed.access_lists.keys().collect::<Vec<_>>(),
        vec!["localsite", "term"]
    );
    assert_eq!(parsed.static_list.len(), 1);
    assert_eq!(parsed.redistributed_static_list.len(), 1);
    assert!(parsed.peer_map.interfaces.is_empty());
}

#[test]
fn test_analyze_r201_peer_map() {
    let analyzer = Analyzer::new();
    analyzer.analyze(&load_snapshot("r201"));

    assert_no_anomalies(&analyzer.analysis().router_anomaly);
    let parsed = analyzer.parsed_data();
    assert_eq!(parsed.peer_map.neighbors.len(), 2);
}

#[test]
fn test_missing_is_state_keeps_result() {
    let analyzer = Analyzer::new();
    analyzer.analyze(&r101_extra_external());
    let previous = analyzer.analysis().external_anomaly.clone();
    assert_eq!(
        prefix_keys(&previous.superfluous_entries),
        vec!["172.16.9.0/24"]
    );

    // The external LSDB couldn't be fetched this time.
    let mut snapshot = load_snapshot("r101");
    snapshot.ospf_external = None;
    analyzer.analyze(&snapshot);
    assert_eq!(analyzer.analysis().external_anomaly, previous);
}

#[test]
fn test_missing_should_state_resets_result() {
    let analyzer = Analyzer::new();
    analyzer.analyze(&r101_extra_external());
    assert!(analyzer.analysis().external_anomaly.has_anomalies());

    // Without any redistribution, no type-5 LSA is expected.
    let mut snapshot = r101_extra_external();
    if let Some(ospf) = snapshot
        .static_config
        .as_mut()
        .and_then(|config| config.ospf_config.as_mut())
    {
        ospf.redistribution.clear();
    }
    analyzer.analyze(&snapshot);
    assert_eq!(
        analyzer.analysis().external_anomaly,
        AnomalyDetection::default()
    );
    assert!(analyzer.parsed_data().should_external_lsdb.is_none());
}

#[test]
fn test_missing_static_config_skips_cycle() {
    let analyzer = Analyzer::new();
    analyzer.analyze(&r101_extra_external());
    let analysis = analyzer.analysis();
    let parsed = analyzer.parsed_data();

    let mut snapshot = load_snapshot("r101");
    snapshot.static_config = None;
    analyzer.analyze(&snapshot);
    assert!(Arc::ptr_eq(&analysis, &analyzer.analysis()));
    assert!(Arc::ptr_eq(&parsed, &analyzer.parsed_data()));
}

#[test]
fn test_analysis_is_idempotent() {
    let analyzer = Analyzer::new();
    let snapshot = r101_extra_external();
    analyzer.analyze(&snapshot);
    let first = analyzer.analysis();
    analyzer.analyze(&snapshot);
    assert_eq!(*first, *analyzer.analysis());
}
