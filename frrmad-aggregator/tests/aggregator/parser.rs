//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use frrmad_aggregator::parser::parse_static_config;
use frrmad_utils::config::{
    AccessAction, AccessListDestination, AreaType, StaticFrrConfiguration,
};

use crate::load_fixture;

fn expected_config(router: &str) -> StaticFrrConfiguration {
    serde_json::from_str(&load_fixture(router, "config.json")).unwrap()
}

#[test]
fn test_r101_config() {
    let config = parse_static_config(&load_fixture("r101", "frr.conf"));
    assert_eq!(config, expected_config("r101"));

    // Redistribution clauses inside the BGP block don't leak into OSPF.
    assert!(!config.redistributes("connected"));
    assert!(config.redistributes("static"));

    let term = &config.access_lists["term"];
    assert_eq!(term.items.len(), 2);
    assert_eq!(term.items[1].action, AccessAction::Deny);
    assert_eq!(term.items[1].destination, AccessListDestination::Any);
}

#[test]
fn test_r201_config() {
    let config = parse_static_config(&load_fixture("r201", "frr.conf"));
    assert_eq!(config, expected_config("r201"));
}

#[test]
fn test_ospf_areas() {
    let config = parse_static_config(
        "router ospf\n\
         \x20ospf router-id 65.0.1.3\n\
         \x20area 1 nssa\n\
         \x20area 0.0.0.2 virtual-link 65.0.1.22\n\
         \x20area 0.0.0.3 stub no-summary\n\
         \x20area 0.0.0.4 range 10.4.0.0/16\n\
         exit\n\
         route-map nssa-routes deny 5\n\
         \x20match ip address prefix-list bogons\n\
         exit\n\
         route-map nssa-routes permit 10\n\
         \x20match ip address nssa-acl\n\
         exit\n",
    );

    // Area ranges don't define an area on their own.
    let areas = config
        .ospf_areas()
        .map(|area| (area.name.as_str(), area.area_type))
        .collect::<Vec<_>>();
    assert_eq!(
        areas,
        vec![
            ("0.0.0.1", AreaType::Nssa),
            ("0.0.0.2", AreaType::Transit),
            ("0.0.0.3", AreaType::Stub),
        ]
    );
    assert_eq!(config.nssa_areas(), vec!["0.0.0.1"]);
    assert_eq!(
        config.ospf_areas().nth(1).unwrap().virtual_link_neighbor,
        Some("65.0.1.22".parse().unwrap())
    );

    let entries = config.route_maps["nssa-routes"]
        .entries
        .iter()
        .map(|entry| {
            (entry.sequence, entry.permit, entry.match_access_list.as_deref())
        })
        .collect::<Vec<_>>();
    assert_eq!(entries, vec![(5, false, None), (10, true, Some("nssa-acl"))]);
}
