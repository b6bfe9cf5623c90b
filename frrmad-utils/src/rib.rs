//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// Output of `show ip route json`.
//
// Prefix -> routes for that prefix, one per protocol.
#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(transparent)]
pub struct Rib {
    pub routes: BTreeMap<String, Vec<RibRoute>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RibRoute {
    pub prefix: String,
    pub prefix_len: u8,
    pub protocol: String,
    pub selected: bool,
    pub dest_selected: bool,
    pub distance: u32,
    pub metric: u32,
    pub installed: bool,
    pub uptime: String,
    pub nexthops: Vec<RibNexthop>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RibNexthop {
    pub flags: u32,
    pub fib: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ip: String,
    pub afi: String,
    pub interface_index: u32,
    pub interface_name: String,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directly_connected: Option<bool>,
}

// ===== impl Rib =====

impl Rib {
    // Returns all routes learned through the given protocol.
    pub fn protocol_routes<'a>(
        &'a self,
        protocol: &'a str,
    ) -> impl Iterator<Item = &'a RibRoute> + 'a {
        self.routes
            .values()
            .flatten()
            .filter(move |route| route.protocol == protocol)
    }

    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.routes.get(prefix).is_some_and(|routes| !routes.is_empty())
    }
}

// ===== impl RibRoute =====

impl RibRoute {
    // Returns whether at least one nexthop of the route is installed in the
    // FIB.
    pub fn is_in_fib(&self) -> bool {
        self.nexthops.iter().any(|nexthop| nexthop.fib)
    }

    // Returns the address of the first nexthop installed in the FIB.
    pub fn fib_nexthop(&self) -> Option<&str> {
        self.nexthops
            .iter()
            .find(|nexthop| nexthop.fib && !nexthop.ip.is_empty())
            .map(|nexthop| nexthop.ip.as_str())
    }
}

// ===== unit tests =====
