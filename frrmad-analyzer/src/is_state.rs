//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

//! Is-state builders.
//!
//! These convert the self-originated LSAs reported by ospfd into the same
//! advertisement model used by the should-state builders.

use std::net::Ipv4Addr;

use frrmad_utils::config::AreaType;
use frrmad_utils::ip::{Ipv4AddrExt, netmask_to_prefixlen};
use frrmad_utils::ospf::{
    OspfExternalData, OspfNssaExternalData, OspfRouterData, RouterLink,
};

use crate::advertisement::{Advertisement, LinkKind};
use crate::debug::Debug;
use crate::error::Error;
use crate::lsdb::{
    Area, EXTERNAL_AREA, InterAreaLsa, IntraAreaLsa, LsaType, RouterType,
};
use crate::peer::PeerInterfaceMap;

// ===== global functions =====

/// Builds the observed router-LSA topology.
///
/// Links that can't be classified or carry a malformed mask are logged and
/// skipped. Unnumbered point-to-point links are reported by FRR with a
/// pseudo-address; those are replaced with the local address of the
/// point-to-point interface facing the neighbor, when known.
pub fn router_lsdb(
    data: &OspfRouterData,
    hostname: &str,
    peers: &PeerInterfaceMap,
) -> IntraAreaLsa {
    let mut router_type = RouterType::Internal;
    let mut areas = vec![];

    for (area_name, lsas) in &data.router_states {
        let mut area = Area::new(area_name, LsaType::Router, AreaType::Normal);
        for lsa in lsas.values() {
            if lsa.asbr {
                router_type = RouterType::Asbr;
            } else if lsa.abr && router_type == RouterType::Internal {
                router_type = RouterType::Abr;
            }

            for link in lsa.router_links.values() {
                match router_link(link, peers) {
                    Ok(adv) => area.links.push(adv),
                    Err(error) => error.log(),
                }
            }
        }
        areas.push(area);
    }

    let lsdb = IntraAreaLsa {
        hostname: hostname.to_owned(),
        router_id: data.router_id.clone(),
        router_type,
        areas,
    };
    Debug::IsStateBuild(LsaType::Router, lsdb.link_count()).log();
    lsdb
}

/// Builds the observed AS-external topology.
///
/// The prefix length is the LSA's network mask field taken verbatim: FRR
/// reports it as a plain integer.
pub fn external_lsdb(data: &OspfExternalData, hostname: &str) -> InterAreaLsa {
    let mut area =
        Area::new(EXTERNAL_AREA, LsaType::AsExternal, AreaType::Normal);
    area.links = data
        .as_external_link_states
        .iter()
        .map(|(lsa_id, lsa)| {
            external_link(
                lsa_id,
                &lsa.link_state_id,
                lsa.network_mask,
                LinkKind::External,
            )
        })
        .collect();

    let lsdb = InterAreaLsa {
        hostname: hostname.to_owned(),
        router_id: data.router_id.clone(),
        areas: vec![area],
    };
    Debug::IsStateBuild(LsaType::AsExternal, lsdb.link_count()).log();
    lsdb
}

/// Builds the observed NSSA-external topology, one area per NSSA.
pub fn nssa_external_lsdb(
    data: &OspfNssaExternalData,
    hostname: &str,
) -> InterAreaLsa {
    let areas = data
        .nssa_external_link_states
        .iter()
        .map(|(area_name, lsas)| {
            let mut area =
                Area::new(area_name, LsaType::NssaExternal, AreaType::Nssa);
            area.links = lsas
                .iter()
                .map(|(lsa_id, lsa)| {
                    external_link(
                        lsa_id,
                        &lsa.link_state_id,
                        lsa.network_mask,
                        LinkKind::NssaExternal,
                    )
                })
                .collect();
            area
        })
        .collect();

    let lsdb = InterAreaLsa {
        hostname: hostname.to_owned(),
        router_id: data.router_id.clone(),
        areas,
    };
    Debug::IsStateBuild(LsaType::NssaExternal, lsdb.link_count()).log();
    lsdb
}

// ===== helper functions =====

fn router_link(
    link: &RouterLink,
    peers: &PeerInterfaceMap,
) -> Result<Advertisement, Error> {
    let kind = LinkKind::from_frr(&link.link_type)
        .ok_or_else(|| Error::UnknownLinkType(link.link_type.clone()))?;

    let adv = match kind {
        LinkKind::Stub => {
            let plen = netmask_to_prefixlen(&link.network_mask).ok_or_else(
                || {
                    Error::InvalidNetworkMask(
                        link.network_address.clone(),
                        link.network_mask.clone(),
                    )
                },
            )?;
            Advertisement::new(
                link.network_address.clone(),
                link.network_address.clone(),
                plen.to_string(),
                kind,
            )
        }
        LinkKind::Transit => Advertisement::new(
            link.router_interface_address.clone(),
            link.designated_router_address.clone(),
            String::new(),
            kind,
        ),
        LinkKind::PointToPoint => {
            let unnumbered = link
                .router_interface_address
                .parse::<Ipv4Addr>()
                .is_ok_and(|addr| addr.is_unnumbered());
            let address = unnumbered
                .then(|| peers.neighbor_address(&link.neighbor_router_id))
                .flatten()
                .map(|addr| addr.to_string())
                .unwrap_or_else(|| link.router_interface_address.clone());
            Advertisement::new(
                address,
                link.neighbor_router_id.clone(),
                String::new(),
                kind,
            )
        }
        LinkKind::VirtualLink => {
            let remote = if link.neighbor_router_id.is_empty() {
                &link.router_interface_address
            } else {
                &link.neighbor_router_id
            };
            Advertisement::new(
                String::new(),
                remote.clone(),
                String::new(),
                kind,
            )
        }
        LinkKind::External | LinkKind::NssaExternal => {
            return Err(Error::UnknownLinkType(link.link_type.clone()));
        }
    };

    Ok(adv)
}

fn external_link(
    lsa_id: &str,
    link_state_id: &str,
    network_mask: u32,
    kind: LinkKind,
) -> Advertisement {
    let link_state_id = if link_state_id.is_empty() {
        lsa_id
    } else {
        link_state_id
    };
    Advertisement::new(
        String::new(),
        link_state_id.to_owned(),
        network_mask.to_string(),
        kind,
    )
}

// ===== unit tests =====
