//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeSet;
use std::sync::LazyLock as Lazy;

use frrmad_analyzer::acl::{AccessLists, access_lists};
use frrmad_analyzer::advertisement::{Advertisement, LinkKind};
use frrmad_analyzer::anomaly::router_anomaly;
use frrmad_analyzer::lsdb::{IntraAreaLsa, RouterType};
use frrmad_analyzer::peer::PeerInterfaceMap;
use frrmad_analyzer::{is_state, should_state};
use frrmad_utils::config::{
    AccessAction, AccessListDestination, AccessListItem, AreaType,
    StaticFrrConfiguration,
};
use frrmad_utils::ospf::{OspfNeighbors, OspfRouterData};

use crate::{assert_no_anomalies, keys, load_fixture};

static R101_CONFIG: Lazy<StaticFrrConfiguration> =
    Lazy::new(|| load_fixture("r101", "config.json"));
static R101_ROUTER: Lazy<OspfRouterData> =
    Lazy::new(|| load_fixture("r101", "router.json"));

//
// Helper functions.
//

fn r101_should_state() -> IntraAreaLsa {
    should_state::router_lsdb(&R101_CONFIG).unwrap()
}

fn r101_is_state() -> IntraAreaLsa {
    is_state::router_lsdb(&R101_ROUTER, "r101", &PeerInterfaceMap::default())
}

// r101's access-lists without the trailing "deny any" entry.
fn r101_acls_without_deny_any() -> AccessLists {
    let mut config = R101_CONFIG.clone();
    config.access_lists.remove("term");
    access_lists(&config)
}

fn remove_links(lsdb: &mut IntraAreaLsa, removed: &[&str]) {
    for area in &mut lsdb.areas {
        area.links.retain(|adv| !removed.contains(&adv.key().as_str()));
    }
}

//
// Tests.
//

#[test]
fn test_r101_should_state() {
    let lsdb = r101_should_state();
    assert_eq!(lsdb.hostname, "r101");
    assert_eq!(lsdb.router_id, "65.0.1.1");
    assert_eq!(lsdb.router_type, RouterType::Internal);
    assert_eq!(lsdb.areas.len(), 1);

    let area = lsdb.area("0.0.0.0").unwrap();
    assert_eq!(area.area_type, AreaType::Normal);
    assert_eq!(
        keys(&area.links),
        vec![
            "10.0.12.1",
            "10.0.2.0",
            "10.0.13.1",
            "10.0.0.0",
            "10.0.14.1",
            "10.0.15.1",
            "10.0.16.1",
            "10.0.17.1",
            "10.0.18.1",
            "10.0.19.1",
        ]
    );
    let stubs = area
        .links
        .iter()
        .filter(|adv| adv.link_type == LinkKind::Stub)
        .map(|adv| adv.prefix_length.as_str())
        .collect::<Vec<_>>();
    assert_eq!(stubs, vec!["24", "23"]);
}

#[test]
fn test_r101_is_state() {
    let lsdb = r101_is_state();
    assert_eq!(lsdb.router_id, "65.0.1.1");
    assert_eq!(lsdb.router_type, RouterType::Asbr);
    assert_eq!(lsdb.link_count(), 10);

    let stub = lsdb.links().find(|adv| adv.key() == "10.0.0.0").unwrap();
    assert_eq!(stub.link_type, LinkKind::Stub);
    assert_eq!(stub.prefix_length, "23");
}

#[test]
fn test_r101_no_anomalies() {
    let acls = access_lists(&R101_CONFIG);
    let result = router_anomaly(&acls, &r101_should_state(), &r101_is_state());
    assert_no_anomalies(&result);
}

#[test]
fn test_r101_missing_entries() {
    let mut is_state = r101_is_state();
    remove_links(&mut is_state, &["10.0.12.1", "10.0.2.0"]);

    let acls = r101_acls_without_deny_any();
    let result = router_anomaly(&acls, &r101_should_state(), &is_state);
    assert!(result.has_under_advertised_prefixes);
    assert!(!result.has_over_advertised_prefixes);
    assert_eq!(result.missing_entries.len(), 2);
    assert_eq!(
        keys(&result.missing_entries)
            .into_iter()
            .collect::<BTreeSet<_>>(),
        ["10.0.12.1".to_owned(), "10.0.2.0".to_owned()].into()
    );
}

#[test]
fn test_r101_superfluous_entries() {
    let mut should_state = r101_should_state();
    remove_links(&mut should_state, &["10.0.12.1", "10.0.2.0"]);

    let acls = r101_acls_without_deny_any();
    let result = router_anomaly(&acls, &should_state, &r101_is_state());
    assert!(result.has_over_advertised_prefixes);
    assert!(!result.has_under_advertised_prefixes);
    assert_eq!(keys(&result.superfluous_entries).len(), 2);
}

#[test]
fn test_deny_any_suppresses_missing() {
    let mut is_state = r101_is_state();
    remove_links(&mut is_state, &["10.0.12.1", "10.0.2.0"]);

    // The "term" access-list ends with "deny any".
    let acls = access_lists(&R101_CONFIG);
    let result = router_anomaly(&acls, &r101_should_state(), &is_state);
    assert!(result.missing_entries.is_empty());
    assert!(!result.has_under_advertised_prefixes);

    // Removing the entry makes the missing links reappear.
    let acls = r101_acls_without_deny_any();
    let result = router_anomaly(&acls, &r101_should_state(), &is_state);
    assert_eq!(result.missing_entries.len(), 2);
}

#[test]
fn test_prefix_deny_suppresses_single_entry() {
    let mut is_state = r101_is_state();
    remove_links(&mut is_state, &["10.0.12.1", "10.0.2.0"]);

    let mut config = R101_CONFIG.clone();
    config.access_lists.remove("term");
    if let Some(acl) = config.access_lists.get_mut("localsite") {
        acl.items.push(AccessListItem {
            sequence: 20,
            action: AccessAction::Deny,
            destination: AccessListDestination::Prefix(
                "10.0.12.1/32".parse().unwrap(),
            ),
        });
    }
    let acls = access_lists(&config);
    let result = router_anomaly(&acls, &r101_should_state(), &is_state);
    assert_eq!(keys(&result.missing_entries), vec!["10.0.2.0"]);
}

#[test]
fn test_idempotence() {
    let mut is_state = r101_is_state();
    remove_links(&mut is_state, &["10.0.12.1"]);
    is_state.areas[0].links.push(Advertisement::new(
        "10.0.99.1".to_owned(),
        String::new(),
        String::new(),
        LinkKind::Transit,
    ));

    let acls = r101_acls_without_deny_any();
    let should_state = r101_should_state();
    let first = router_anomaly(&acls, &should_state, &is_state);
    let second = router_anomaly(&acls, &should_state, &is_state);
    assert_eq!(first, second);
    assert_eq!(first.missing_entries.len(), 1);
    assert_eq!(first.superfluous_entries.len(), 1);
}

#[test]
fn test_missing_and_superfluous_are_disjoint() {
    let mut should_state = r101_should_state();
    let mut is_state = r101_is_state();
    remove_links(&mut should_state, &["10.0.13.1", "10.0.14.1"]);
    remove_links(&mut is_state, &["10.0.15.1", "10.0.0.0"]);

    let acls = r101_acls_without_deny_any();
    let result = router_anomaly(&acls, &should_state, &is_state);
    let missing = keys(&result.missing_entries)
        .into_iter()
        .collect::<BTreeSet<_>>();
    let superfluous = keys(&result.superfluous_entries)
        .into_iter()
        .collect::<BTreeSet<_>>();
    assert_eq!(missing.len(), 2);
    assert_eq!(superfluous.len(), 2);
    assert!(missing.is_disjoint(&superfluous));
}

#[test]
fn test_duplicates_reported_once() {
    let mut is_state = r101_is_state();
    let dup = is_state
        .links()
        .find(|adv| adv.key() == "10.0.13.1")
        .cloned()
        .unwrap();
    is_state.areas[0].links.push(dup.clone());
    is_state.areas[0].links.push(dup);

    let acls = access_lists(&R101_CONFIG);
    let result = router_anomaly(&acls, &r101_should_state(), &is_state);
    assert!(result.has_duplicate_prefixes);
    assert_eq!(keys(&result.duplicate_entries), vec!["10.0.13.1"]);
    assert!(result.missing_entries.is_empty());
    assert!(result.superfluous_entries.is_empty());
}

#[test]
fn test_r201_point_to_point() {
    let config: StaticFrrConfiguration = load_fixture("r201", "config.json");
    let data: OspfRouterData = load_fixture("r201", "router.json");
    let neighbors: OspfNeighbors = load_fixture("r201", "neighbors.json");

    let peers = PeerInterfaceMap::new(&config, Some(&neighbors));
    assert_eq!(peers.interfaces.len(), 2);
    assert_eq!(
        peers.neighbor_address("65.0.2.3").unwrap().to_string(),
        "10.20.13.1"
    );
    assert_eq!(
        peers.neighbor_address("65.0.2.4").unwrap().to_string(),
        "10.20.14.1"
    );

    let should_state = should_state::router_lsdb(&config).unwrap();
    let p2p = should_state
        .links()
        .filter(|adv| adv.link_type == LinkKind::PointToPoint)
        .count();
    assert_eq!(p2p, 2);

    let is_state = is_state::router_lsdb(&data, "r201", &peers);
    let acls = access_lists(&config);
    assert_no_anomalies(&router_anomaly(&acls, &should_state, &is_state));
}

#[test]
fn test_point_to_point_differences_ignored() {
    let config: StaticFrrConfiguration = load_fixture("r201", "config.json");
    let data: OspfRouterData = load_fixture("r201", "router.json");
    let should_state = should_state::router_lsdb(&config).unwrap();
    let mut is_state =
        is_state::router_lsdb(&data, "r201", &PeerInterfaceMap::default());

    // Drop one point-to-point link and add an unexpected one.
    remove_links(&mut is_state, &["10.20.13.1"]);
    is_state.areas[0].links.push(Advertisement::new(
        "10.20.99.1".to_owned(),
        "65.0.2.9".to_owned(),
        String::new(),
        LinkKind::PointToPoint,
    ));

    let acls = access_lists(&config);
    assert_no_anomalies(&router_anomaly(&acls, &should_state, &is_state));
}

#[test]
fn test_r103_virtual_link() {
    let config: StaticFrrConfiguration = load_fixture("r103", "config.json");
    let data: OspfRouterData = load_fixture("r103", "router.json");

    let should_state = should_state::router_lsdb(&config).unwrap();
    assert_eq!(should_state.router_type, RouterType::Abr);
    let transit = should_state.area("0.0.0.2").unwrap();
    assert_eq!(transit.area_type, AreaType::Transit);
    assert!(transit.links.iter().any(|adv| {
        adv.link_type == LinkKind::VirtualLink && adv.key() == "65.0.1.22"
    }));

    let is_state =
        is_state::router_lsdb(&data, "r103", &PeerInterfaceMap::default());
    assert_eq!(is_state.router_type, RouterType::Abr);
    let acls = access_lists(&config);
    assert_no_anomalies(&router_anomaly(&acls, &should_state, &is_state));
}
