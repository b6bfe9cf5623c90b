//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use enum_as_inner::EnumAsInner;
use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};

// Static FRR configuration, as parsed from `show running-config` or from the
// FRR configuration file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFrrConfiguration {
    pub hostname: String,
    pub frr_version: String,
    pub interfaces: Vec<Interface>,
    pub static_routes: Vec<StaticRoute>,
    pub ospf_config: Option<OspfConfig>,
    pub access_lists: BTreeMap<String, AccessList>,
    pub route_maps: BTreeMap<String, RouteMap>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct Interface {
    pub name: String,
    // OSPF area the interface belongs to (`ip ospf area`).
    pub area: Option<String>,
    // Explicit OSPF network type (`ip ospf network`).
    pub network_type: Option<NetworkType>,
    pub ip_prefixes: Vec<InterfaceIpPrefix>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct InterfaceIpPrefix {
    pub ip_prefix: Ipv4Network,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer: Option<Ipv4Network>,
    #[serde(default)]
    pub passive: bool,
}

// OSPF interface network type.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkType {
    Broadcast,
    NonBroadcast,
    PointToMultipoint,
    PointToPoint,
    Loopback,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct StaticRoute {
    pub prefix: Ipv4Network,
    pub next_hop: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct OspfConfig {
    pub router_id: Option<Ipv4Addr>,
    pub redistribution: Vec<Redistribution>,
    pub areas: Vec<OspfArea>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct Redistribution {
    #[serde(rename = "type")]
    pub route_type: String,
    pub metric: Option<u32>,
    pub metric_type: Option<u8>,
    pub route_map: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct OspfArea {
    pub name: String,
    pub area_type: AreaType,
    pub virtual_link_neighbor: Option<Ipv4Addr>,
}

// OSPF area type.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AreaType {
    #[default]
    Normal,
    Nssa,
    Stub,
    // Transit area carrying a virtual link.
    Transit,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct AccessList {
    pub items: Vec<AccessListItem>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct AccessListItem {
    pub sequence: u32,
    pub action: AccessAction,
    pub destination: AccessListDestination,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessAction {
    Permit,
    Deny,
}

#[derive(Clone, Debug, EnumAsInner, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessListDestination {
    Any,
    Prefix(Ipv4Network),
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct RouteMap {
    pub entries: Vec<RouteMapEntry>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct RouteMapEntry {
    pub sequence: u32,
    pub permit: bool,
    pub match_access_list: Option<String>,
}

// ===== impl StaticFrrConfiguration =====

impl StaticFrrConfiguration {
    pub fn router_id(&self) -> Option<Ipv4Addr> {
        self.ospf_config.as_ref().and_then(|ospf| ospf.router_id)
    }

    // Returns the declared type of the given area, defaulting to a normal
    // area.
    pub fn area_type(&self, area: &str) -> AreaType {
        self.ospf_areas()
            .find(|oa| oa.name == area)
            .map(|oa| oa.area_type)
            .unwrap_or_default()
    }

    pub fn ospf_areas(&self) -> impl Iterator<Item = &OspfArea> {
        self.ospf_config
            .iter()
            .flat_map(|ospf| ospf.areas.iter())
    }

    // Returns the names of all areas declared as NSSA, in declaration order.
    pub fn nssa_areas(&self) -> Vec<&str> {
        let mut areas: Vec<&str> = vec![];
        for area in self.ospf_areas() {
            if area.area_type == AreaType::Nssa
                && !areas.contains(&area.name.as_str())
            {
                areas.push(&area.name);
            }
        }
        areas
    }

    pub fn redistribution(&self) -> impl Iterator<Item = &Redistribution> {
        self.ospf_config
            .iter()
            .flat_map(|ospf| ospf.redistribution.iter())
            .filter(|redist| !redist.route_type.is_empty())
    }

    pub fn redistributes(&self, route_type: &str) -> bool {
        self.redistribution()
            .any(|redist| redist.route_type == route_type)
    }

    // Returns the interfaces that run OSPF, i.e. that have an area assigned.
    pub fn ospf_interfaces(&self) -> impl Iterator<Item = (&Interface, &str)> {
        self.interfaces.iter().filter_map(|iface| {
            iface
                .area
                .as_deref()
                .filter(|area| !area.is_empty())
                .map(|area| (iface, area))
        })
    }
}

// ===== impl Interface =====

impl Interface {
    // Returns the OSPF network type of the interface.
    //
    // When not configured explicitly, an interface with a peer address is
    // point-to-point, an interface named "lo*" is a loopback, and anything
    // else is broadcast.
    pub fn network_type(&self) -> NetworkType {
        if let Some(network_type) = self.network_type {
            return network_type;
        }
        if self.ip_prefixes.iter().any(|prefix| prefix.peer.is_some()) {
            NetworkType::PointToPoint
        } else if self.name.starts_with("lo") {
            NetworkType::Loopback
        } else {
            NetworkType::Broadcast
        }
    }
}

// ===== impl NetworkType =====

impl std::str::FromStr for NetworkType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "broadcast" => Ok(NetworkType::Broadcast),
            "non-broadcast" => Ok(NetworkType::NonBroadcast),
            "point-to-multipoint" => Ok(NetworkType::PointToMultipoint),
            "point-to-point" => Ok(NetworkType::PointToPoint),
            "loopback" => Ok(NetworkType::Loopback),
            _ => Err(()),
        }
    }
}

// ===== impl AreaType =====

impl std::fmt::Display for AreaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AreaType::Normal => write!(f, "normal"),
            AreaType::Nssa => write!(f, "nssa"),
            AreaType::Stub => write!(f, "stub"),
            AreaType::Transit => write!(f, "transit"),
        }
    }
}

// ===== impl AccessListItem =====

impl AccessListItem {
    pub fn is_permit(&self) -> bool {
        self.action == AccessAction::Permit
    }
}

// ===== unit tests =====
