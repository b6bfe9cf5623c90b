//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use frrmad_utils::config::StaticFrrConfiguration;
use frrmad_utils::ospf::OspfNeighbors;
use serde::{Deserialize, Serialize};

use crate::debug::Debug;

// Point-to-point address resolution tables.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct PeerInterfaceMap {
    // Interface name -> local address, for interfaces with a peer clause.
    pub interfaces: BTreeMap<String, Ipv4Addr>,
    // Neighbor router ID -> local address of the link it was seen on.
    pub neighbors: BTreeMap<String, Ipv4Addr>,
}

// ===== impl PeerInterfaceMap =====

impl PeerInterfaceMap {
    pub fn new(
        config: &StaticFrrConfiguration,
        neighbors: Option<&OspfNeighbors>,
    ) -> PeerInterfaceMap {
        let interfaces = peer_interfaces(config);
        let neighbors = neighbors
            .map(|neighbors| peer_neighbors(neighbors, &interfaces))
            .unwrap_or_default();
        PeerInterfaceMap {
            interfaces,
            neighbors,
        }
    }

    // Returns the local address of the point-to-point link towards the given
    // neighbor.
    pub fn neighbor_address(&self, router_id: &str) -> Option<Ipv4Addr> {
        self.neighbors.get(router_id.trim()).copied()
    }
}

// ===== global functions =====

// Maps every interface configured with a peer clause to its local address.
pub fn peer_interfaces(
    config: &StaticFrrConfiguration,
) -> BTreeMap<String, Ipv4Addr> {
    config
        .interfaces
        .iter()
        .filter_map(|iface| {
            iface
                .ip_prefixes
                .iter()
                .find(|prefix| prefix.peer.is_some())
                .map(|prefix| (iface.name.clone(), prefix.ip_prefix.ip()))
        })
        .collect()
}

// Maps neighbor router IDs to the local address of the point-to-point
// interface the adjacency was formed on.
pub fn peer_neighbors(
    neighbors: &OspfNeighbors,
    interfaces: &BTreeMap<String, Ipv4Addr>,
) -> BTreeMap<String, Ipv4Addr> {
    let mut map = BTreeMap::new();
    for (router_id, adjacencies) in &neighbors.neighbors {
        for nbr in adjacencies {
            if let Some(address) = interfaces.get(nbr.ifname()) {
                Debug::PeerResolve(router_id, address).log();
                map.insert(router_id.clone(), *address);
            }
        }
    }
    map
}

// ===== unit tests =====
