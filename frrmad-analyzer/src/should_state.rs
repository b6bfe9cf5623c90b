//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

//! Should-state builders.
//!
//! These derive the advertisements the router is expected to originate from
//! its static configuration alone. A builder returns `None` when the
//! configuration can't cause the router to originate any LSA of that type.

use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;

use frrmad_utils::config::{
    AreaType, InterfaceIpPrefix, NetworkType, StaticFrrConfiguration,
};
use frrmad_utils::ip::Ipv4NetworkExt;
use ipnetwork::Ipv4Network;

use crate::advertisement::{Advertisement, LinkKind};
use crate::debug::Debug;
use crate::lsdb::{
    Area, EXTERNAL_AREA, InterAreaLsa, IntraAreaLsa, LsaType, RouterType,
};

// ===== global functions =====

/// Builds the expected router-LSA topology.
///
/// Every prefix of an OSPF-enabled interface yields one or two links:
///
/// * passive prefix: stub network of the masked prefix;
/// * loopback interface: stub network of the host address;
/// * point-to-point interface: point-to-point link with the local address,
///   plus a stub network for the peer prefix (or the masked local prefix when
///   no peer is configured);
/// * anything else: transit network with the interface address.
///
/// A virtual link configured through a transit area adds a virtual link
/// identified by the remote router ID to that area.
pub fn router_lsdb(config: &StaticFrrConfiguration) -> Option<IntraAreaLsa> {
    let mut links: BTreeMap<&str, Vec<Advertisement>> = BTreeMap::new();

    for (iface, area) in config.ospf_interfaces() {
        let network_type = iface.network_type();
        let area_links = links.entry(area).or_default();
        for prefix in &iface.ip_prefixes {
            area_links.extend(interface_links(network_type, prefix));
        }
    }

    for area in config.ospf_areas() {
        if area.area_type != AreaType::Transit {
            continue;
        }
        if let Some(nbr_router_id) = area.virtual_link_neighbor {
            let vlink = Advertisement::new(
                String::new(),
                nbr_router_id.to_string(),
                String::new(),
                LinkKind::VirtualLink,
            );
            links.entry(area.name.as_str()).or_default().push(vlink);
        }
    }

    if links.values().all(|links| links.is_empty()) {
        Debug::ShouldStateAbsent(LsaType::Router).log();
        return None;
    }

    let router_type = match links.len() {
        1 => RouterType::Internal,
        _ if config.redistributes("bgp") => RouterType::Asbr,
        _ => RouterType::Abr,
    };
    let areas = links
        .into_iter()
        .map(|(name, links)| Area {
            links,
            ..Area::new(name, LsaType::Router, config.area_type(name))
        })
        .collect::<Vec<_>>();

    let lsdb = IntraAreaLsa {
        hostname: config.hostname.clone(),
        router_id: router_id(config),
        router_type,
        areas,
    };
    Debug::ShouldStateBuild(LsaType::Router, lsdb.link_count()).log();
    Some(lsdb)
}

/// Builds the expected AS-external (type-5) topology.
///
/// Requires at least one `redistribute` clause, of any source, and at least
/// one non-NSSA area unless no area is configured at all. The prefixes of
/// every interface outside NSSAs are expected, along with every static
/// route. Neither the redistributed source nor the attached route-map is
/// checked per prefix, so this over-approximates what FRR originates.
pub fn external_lsdb(config: &StaticFrrConfiguration) -> Option<InterAreaLsa> {
    if config.redistribution().next().is_none() {
        Debug::ShouldStateAbsent(LsaType::AsExternal).log();
        return None;
    }

    let nssa_areas = config.nssa_areas();
    let areas = config
        .ospf_interfaces()
        .map(|(_, area)| area)
        .chain(config.ospf_areas().map(|area| area.name.as_str()))
        .collect::<BTreeSet<_>>();
    if !areas.is_empty() && areas.iter().all(|area| nssa_areas.contains(area))
    {
        Debug::ShouldStateAbsent(LsaType::AsExternal).log();
        return None;
    }

    let area = Area {
        links: external_links(config, LinkKind::External, |area| {
            !nssa_areas.contains(&area)
        }),
        ..Area::new(EXTERNAL_AREA, LsaType::AsExternal, AreaType::Normal)
    };

    let lsdb = InterAreaLsa {
        hostname: config.hostname.clone(),
        router_id: router_id(config),
        areas: vec![area],
    };
    Debug::ShouldStateBuild(LsaType::AsExternal, lsdb.link_count()).log();
    Some(lsdb)
}

/// Builds the expected NSSA-external (type-7) topology, one area per NSSA.
///
/// Static routes are attributed to every NSSA, as the route-map attached to
/// the redistribution isn't evaluated per prefix here.
pub fn nssa_external_lsdb(
    config: &StaticFrrConfiguration,
) -> Option<InterAreaLsa> {
    let nssa_areas = config.nssa_areas();
    if config.redistribution().next().is_none() || nssa_areas.is_empty() {
        Debug::ShouldStateAbsent(LsaType::NssaExternal).log();
        return None;
    }

    let areas = nssa_areas
        .iter()
        .map(|nssa| Area {
            links: external_links(config, LinkKind::NssaExternal, |area| {
                area == *nssa
            }),
            ..Area::new(*nssa, LsaType::NssaExternal, AreaType::Nssa)
        })
        .collect();

    let lsdb = InterAreaLsa {
        hostname: config.hostname.clone(),
        router_id: router_id(config),
        areas,
    };
    Debug::ShouldStateBuild(LsaType::NssaExternal, lsdb.link_count()).log();
    Some(lsdb)
}

// ===== helper functions =====

fn router_id(config: &StaticFrrConfiguration) -> String {
    config
        .router_id()
        .map(|router_id| router_id.to_string())
        .unwrap_or_default()
}

fn interface_links(
    network_type: NetworkType,
    prefix: &InterfaceIpPrefix,
) -> Vec<Advertisement> {
    let addr = prefix.ip_prefix.ip();
    let plen = prefix.ip_prefix.prefix();

    if prefix.passive {
        let network = prefix.ip_prefix.apply_mask();
        return vec![stub_link(network.ip(), network.prefix())];
    }

    match network_type {
        NetworkType::Loopback => {
            vec![stub_link(addr, Ipv4Network::MAX_PREFIXLEN)]
        }
        NetworkType::PointToPoint => {
            let remote = prefix.peer.unwrap_or_else(|| {
                prefix.ip_prefix.apply_mask()
            });
            vec![
                Advertisement::new(
                    addr.to_string(),
                    String::new(),
                    plen.to_string(),
                    LinkKind::PointToPoint,
                ),
                stub_link(remote.ip(), remote.prefix()),
            ]
        }
        NetworkType::Broadcast
        | NetworkType::NonBroadcast
        | NetworkType::PointToMultipoint => vec![Advertisement::new(
            addr.to_string(),
            String::new(),
            plen.to_string(),
            LinkKind::Transit,
        )],
    }
}

fn stub_link(addr: Ipv4Addr, plen: u8) -> Advertisement {
    Advertisement::new(
        addr.to_string(),
        addr.to_string(),
        plen.to_string(),
        LinkKind::Stub,
    )
}

// Collects the prefixes expected to be redistributed: interface prefixes of
// the areas accepted by `area_filter` followed by every static route.
// Repeated prefixes are kept once.
fn external_links(
    config: &StaticFrrConfiguration,
    kind: LinkKind,
    area_filter: impl Fn(&str) -> bool,
) -> Vec<Advertisement> {
    let interface_prefixes = config
        .ospf_interfaces()
        .filter(|&(_, area)| area_filter(area))
        .flat_map(|(iface, _)| iface.ip_prefixes.iter())
        .map(|prefix| prefix.ip_prefix.apply_mask());
    let static_prefixes = config
        .static_routes
        .iter()
        .map(|route| route.prefix.apply_mask());
    let prefixes = interface_prefixes.chain(static_prefixes);

    let mut seen = BTreeSet::new();
    prefixes
        .filter(|prefix| seen.insert(*prefix))
        .map(|prefix| {
            Advertisement::new(
                String::new(),
                prefix.ip().to_string(),
                prefix.prefix().to_string(),
                kind,
            )
        })
        .collect()
}

// ===== unit tests =====
