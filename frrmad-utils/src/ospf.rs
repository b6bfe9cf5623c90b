//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

//! Runtime OSPF state, as reported by `ospfd` in JSON format.
//!
//! The structures below mirror the JSON output of the FRR `show ip ospf ...
//! json` family of commands, so they can be deserialized directly from the
//! daemon's response. Fields not needed by the analysis are kept when they are
//! useful for introspection and otherwise ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// Output of `show ip ospf data router self json`.
#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OspfRouterData {
    pub router_id: String,
    // Area ID -> Link State ID -> Router-LSA.
    #[serde(rename = "Router Link States")]
    pub router_states: BTreeMap<String, BTreeMap<String, RouterLsa>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterLsa {
    pub lsa_age: u32,
    pub options: String,
    pub lsa_flags: u32,
    pub flags: u32,
    pub asbr: bool,
    pub abr: bool,
    pub lsa_type: String,
    pub link_state_id: String,
    pub advertising_router: String,
    pub lsa_seq_number: String,
    pub checksum: String,
    pub length: u32,
    pub num_of_links: u32,
    // Link name ("link0", "link1", ...) -> router link.
    pub router_links: BTreeMap<String, RouterLink>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterLink {
    // "a Transit Network", "Stub Network", "another Router
    // (point-to-point)", "a Virtual Link".
    pub link_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub designated_router_address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub router_interface_address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub neighbor_router_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub network_address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub network_mask: String,
    pub num_of_tos_metrics: u32,
    pub tos0_metric: u32,
}

// Output of `show ip ospf data external self json`.
#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OspfExternalData {
    pub router_id: String,
    // Link State ID -> AS-External-LSA.
    #[serde(rename = "AS External Link States")]
    pub as_external_link_states: BTreeMap<String, ExternalLsa>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalLsa {
    pub lsa_age: u32,
    pub options: String,
    pub lsa_flags: u32,
    pub lsa_type: String,
    pub link_state_id: String,
    pub advertising_router: String,
    pub lsa_seq_number: String,
    pub checksum: String,
    pub length: u32,
    // Prefix length, reported by FRR as a plain integer.
    pub network_mask: u32,
    pub metric_type: String,
    pub tos: u32,
    pub metric: u32,
    pub forward_address: String,
    pub external_route_tag: u32,
}

// Output of `show ip ospf data nssa-external self json`.
#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OspfNssaExternalData {
    pub router_id: String,
    // Area ID -> Link State ID -> NSSA-External-LSA.
    #[serde(
        rename = "NSSA-external Link States",
        alias = "NSSA External Link States"
    )]
    pub nssa_external_link_states:
        BTreeMap<String, BTreeMap<String, NssaExternalLsa>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NssaExternalLsa {
    pub lsa_age: u32,
    pub options: String,
    pub lsa_flags: u32,
    pub lsa_type: String,
    pub link_state_id: String,
    pub advertising_router: String,
    pub lsa_seq_number: String,
    pub checksum: String,
    pub length: u32,
    pub network_mask: u32,
    pub metric_type: String,
    pub tos: u32,
    pub metric: u32,
    pub nssa_forward_address: String,
    pub external_route_tag: u32,
}

// Output of `show ip ospf neighbor json`.
#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OspfNeighbors {
    // Neighbor router ID -> adjacencies with that router.
    pub neighbors: BTreeMap<String, Vec<Neighbor>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Neighbor {
    pub nbr_priority: u32,
    #[serde(alias = "state")]
    pub nbr_state: String,
    pub converged: String,
    pub role: String,
    pub up_time_in_msec: u64,
    pub router_dead_interval_timer_due_msec: u64,
    // Neighbor's address on the shared link.
    #[serde(alias = "address")]
    pub iface_address: String,
    // Local interface, in the "<ifname>:<local address>" format.
    pub iface_name: String,
}

// ===== impl OspfNssaExternalData =====

impl OspfNssaExternalData {
    pub fn lsa_count(&self) -> usize {
        self.nssa_external_link_states
            .values()
            .map(|lsas| lsas.len())
            .sum()
    }
}

// ===== impl Neighbor =====

impl Neighbor {
    // Returns the name of the local interface the adjacency was formed on.
    pub fn ifname(&self) -> &str {
        match self.iface_name.split_once(':') {
            Some((ifname, _)) => ifname,
            None => &self.iface_name,
        }
    }

    pub fn is_full(&self) -> bool {
        self.nbr_state.starts_with("Full")
    }
}

// ===== unit tests =====
