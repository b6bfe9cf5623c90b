//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

//! Consistency checks between the LSDB, the RIB and the FIB.
//!
//! Routes are reported as stub-network advertisements keyed by their prefix.

use std::collections::BTreeMap;

use frrmad_utils::rib::{Rib, RibRoute};

use crate::advertisement::{Advertisement, LinkKind};
use crate::anomaly::AnomalyDetection;
use crate::lsdb::IntraAreaLsa;

// ===== global functions =====

// Reports selected OSPF routes of which no nexthop made it into the FIB.
pub fn rib_to_fib(rib: &Rib) -> AnomalyDetection {
    let missing = rib
        .protocol_routes("ospf")
        .filter(|route| route.selected && !route.is_in_fib())
        .map(route_advertisement)
        .collect();
    AnomalyDetection::new(missing, vec![], vec![])
}

// Reports stub networks of the self-originated router-LSAs for which the RIB
// holds no route at all.
pub fn lsdb_to_rib(is_state: &IntraAreaLsa, rib: &Rib) -> AnomalyDetection {
    let missing = is_state
        .links()
        .filter(|adv| adv.link_type == LinkKind::Stub)
        .map(|adv| {
            let addr = adv.interface_address.trim();
            let prefix = format!("{}/{}", addr, adv.prefix_length);
            (prefix, adv)
        })
        .filter(|(prefix, _)| !rib.contains_prefix(prefix))
        .collect::<BTreeMap<_, _>>()
        .into_values()
        .cloned()
        .collect();
    AnomalyDetection::new(missing, vec![], vec![])
}

// ===== helper functions =====

fn route_advertisement(route: &RibRoute) -> Advertisement {
    let address = match route.prefix.split_once('/') {
        Some((address, _)) => address,
        None => &route.prefix,
    };
    Advertisement::new(
        address.to_owned(),
        address.to_owned(),
        route.prefix_len.to_string(),
        LinkKind::Stub,
    )
}

// ===== unit tests =====
