//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use frrmad_utils::config::{
    AccessListDestination, AccessListItem, StaticFrrConfiguration,
};
use frrmad_utils::ip::Ipv4NetworkExt;
use ipnetwork::Ipv4Network;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::advertisement::{Advertisement, normalize};
use crate::debug::Debug;

pub type AccessLists = BTreeMap<String, AccessListAnalyzer>;

// Static routes keyed by network address.
pub type StaticList = BTreeMap<String, StaticListEntry>;

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct AccessListAnalyzer {
    pub access_list_name: String,
    pub entries: Vec<AclEntry>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct AclEntry {
    // Network address, or "any".
    pub ip_address: String,
    pub prefix_length: u8,
    pub is_permit: bool,
    pub is_any: bool,
    pub sequence: u32,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct StaticListEntry {
    pub ip_address: String,
    pub prefix_length: u8,
    pub next_hop: String,
}

// ===== impl AclEntry =====

impl AclEntry {
    fn matches(&self, adv: &Advertisement) -> bool {
        if self.is_any {
            return true;
        }
        same_address(&self.ip_address, &adv.interface_address)
    }
}

impl From<&AccessListItem> for AclEntry {
    fn from(item: &AccessListItem) -> AclEntry {
        let (ip_address, prefix_length, is_any) = match &item.destination {
            AccessListDestination::Any => ("any".to_owned(), 0, true),
            AccessListDestination::Prefix(prefix) => {
                (prefix.ip().to_string(), prefix.prefix(), false)
            }
        };
        AclEntry {
            ip_address,
            prefix_length,
            is_permit: item.is_permit(),
            is_any,
            sequence: item.sequence,
        }
    }
}

// ===== global functions =====

// Converts the configured access-lists, with entries sorted by sequence
// number.
pub fn access_lists(config: &StaticFrrConfiguration) -> AccessLists {
    config
        .access_lists
        .iter()
        .map(|(name, acl)| {
            let entries = acl
                .items
                .iter()
                .map(AclEntry::from)
                .sorted_by_key(|entry| entry.sequence)
                .collect();
            let acl = AccessListAnalyzer {
                access_list_name: name.clone(),
                entries,
            };
            (name.clone(), acl)
        })
        .collect()
}

/// Returns whether the advertisement is excluded from the should-state by a
/// deny entry.
///
/// Any deny entry disqualifies, regardless of its position in the list: an
/// "any" deny excludes everything, a prefix deny excludes the advertisement
/// whose interface address equals the entry's address. Permit entries are
/// not consulted.
pub fn is_excluded_by_access_list(
    adv: &Advertisement,
    acls: &AccessLists,
) -> bool {
    for acl in acls.values() {
        if acl
            .entries
            .iter()
            .filter(|entry| !entry.is_permit)
            .any(|entry| entry.matches(adv))
        {
            Debug::AclExclude(adv, &acl.access_list_name).log();
            return true;
        }
    }
    false
}

pub fn static_list(config: &StaticFrrConfiguration) -> StaticList {
    config
        .static_routes
        .iter()
        .map(|route| {
            let prefix = route.prefix.apply_mask();
            let entry = StaticListEntry {
                ip_address: prefix.ip().to_string(),
                prefix_length: prefix.prefix(),
                next_hop: route.next_hop.clone(),
            };
            (entry.ip_address.clone(), entry)
        })
        .collect()
}

/// Returns the static routes that `redistribute static` actually injects
/// into OSPF.
///
/// Without a route-map every static route qualifies. With a route-map, a
/// route qualifies when the first matching entry of one of the access-lists
/// referenced by the route-map's permit clauses is a permit. A route-map
/// that doesn't exist denies everything.
pub fn redistributed_static_list(
    config: &StaticFrrConfiguration,
    acls: &AccessLists,
) -> StaticList {
    let Some(redist) = config
        .redistribution()
        .find(|redist| redist.route_type == "static")
    else {
        return StaticList::new();
    };

    let routes = static_list(config);
    let Some(route_map) = &redist.route_map else {
        return routes;
    };
    let Some(route_map) = config.route_maps.get(route_map) else {
        return StaticList::new();
    };

    let matching_acls = route_map
        .entries
        .iter()
        .sorted_by_key(|entry| entry.sequence)
        .filter(|entry| entry.permit)
        .filter_map(|entry| entry.match_access_list.as_deref())
        .filter_map(|name| acls.get(name))
        .collect::<Vec<_>>();

    routes
        .into_iter()
        .filter(|(_, route)| {
            matching_acls.iter().any(|acl| acl_permits(acl, route))
        })
        .collect()
}

// First-match evaluation of an access-list against a static route.
fn acl_permits(acl: &AccessListAnalyzer, route: &StaticListEntry) -> bool {
    let Ok(route_addr) = route.ip_address.parse::<Ipv4Addr>() else {
        return false;
    };

    acl.entries
        .iter()
        .find(|entry| {
            if entry.is_any {
                return true;
            }
            entry
                .ip_address
                .parse::<Ipv4Addr>()
                .ok()
                .and_then(|addr| {
                    Ipv4Network::new(addr, entry.prefix_length).ok()
                })
                .is_some_and(|network| {
                    network.contains(route_addr)
                        && route.prefix_length >= network.prefix()
                })
        })
        .is_some_and(|entry| entry.is_permit)
}

// Compares two addresses, numerically when both parse as IPv4.
fn same_address(a: &str, b: &str) -> bool {
    match (a.trim().parse::<Ipv4Addr>(), b.trim().parse::<Ipv4Addr>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => {
            let (a, b) = (normalize(a), normalize(b));
            !a.is_empty() && a == b
        }
    }
}

// ===== unit tests =====
