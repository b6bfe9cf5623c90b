//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::time::Duration;

use frrmad_aggregator::collector::Collector;
use frrmad_aggregator::fetcher::{
    CMD_OSPF_NEIGHBORS, CMD_OSPF_ROUTER, ConfigSource,
};
use frrmad_aggregator::frrsocket::{FrrSocket, OSPFD_VTY};
use frrmad_utils::config::StaticFrrConfiguration;
use maplit::btreemap;

use crate::{fixture_path, load_fixture, socket_dir, spawn_vty};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_collect_partial() {
    let dir = socket_dir("collect-partial");
    let _vty = spawn_vty(
        &dir.join(OSPFD_VTY),
        btreemap! {
            CMD_OSPF_ROUTER => load_fixture("r201", "router.json"),
            CMD_OSPF_NEIGHBORS => load_fixture("r201", "neighbors.json"),
        },
    );

    let collector = Collector::new(
        FrrSocket::new(dir, TIMEOUT),
        ConfigSource::File(fixture_path("r201", "frr.conf")),
    );
    let snapshot = collector.collect().await;

    let expected: StaticFrrConfiguration =
        serde_json::from_str(&load_fixture("r201", "config.json")).unwrap();
    assert_eq!(snapshot.static_config.as_ref(), Some(&expected));
    assert_eq!(snapshot.hostname(), "r201");
    assert!(snapshot.ospf_router.is_some());
    assert!(snapshot.ospf_neighbors.is_some());

    // Unknown to the fake daemon.
    assert!(snapshot.ospf_external.is_none());
    assert!(snapshot.ospf_nssa_external.is_none());
    // No zebra socket.
    assert!(snapshot.rib.is_none());
}

#[tokio::test]
async fn test_collect_missing_config() {
    let dir = socket_dir("collect-missing-config");

    let collector = Collector::new(
        FrrSocket::new(dir.clone(), TIMEOUT),
        ConfigSource::File(dir.join("frr.conf")),
    );
    let snapshot = collector.collect().await;
    assert!(snapshot.static_config.is_none());
    assert!(snapshot.ospf_router.is_none());
    assert!(snapshot.rib.is_none());
}
