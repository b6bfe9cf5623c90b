//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use derive_new::new;
use serde::{Deserialize, Serialize};

// Kind of a routable fact, shared by the should-state and is-state builders.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub enum LinkKind {
    #[serde(rename = "transit network")]
    Transit,
    #[serde(rename = "stub network")]
    Stub,
    #[serde(rename = "point-to-point")]
    PointToPoint,
    #[serde(rename = "virtual link")]
    VirtualLink,
    #[serde(rename = "external")]
    External,
    #[serde(rename = "nssa-external")]
    NssaExternal,
}

// One comparable fact: a router link, a stub network or an external prefix.
#[derive(Clone, Debug, Eq, PartialEq, new)]
#[derive(Deserialize, Serialize)]
pub struct Advertisement {
    pub interface_address: String,
    pub link_state_id: String,
    pub prefix_length: String,
    pub link_type: LinkKind,
}

// ===== impl LinkKind =====

impl LinkKind {
    /// Classifies a link type as reported by FRR.
    ///
    /// FRR's router-LSA output uses free-form strings ("a Transit Network",
    /// "Stub Network", "another Router (point-to-point)", "a Virtual Link").
    /// The comparison is case-insensitive and ignores a leading article, so
    /// the canonical names produced by [`LinkKind`]'s `Display` impl are
    /// accepted too.
    pub fn from_frr(link_type: &str) -> Option<LinkKind> {
        let link_type = link_type.trim().to_lowercase();
        let link_type = link_type
            .strip_prefix("an ")
            .or_else(|| link_type.strip_prefix("a "))
            .unwrap_or(&link_type);

        if link_type.contains("point-to-point") {
            return Some(LinkKind::PointToPoint);
        }
        match link_type {
            "transit network" => Some(LinkKind::Transit),
            "stub network" => Some(LinkKind::Stub),
            "virtual link" => Some(LinkKind::VirtualLink),
            "external" => Some(LinkKind::External),
            "nssa-external" | "nssa external" => Some(LinkKind::NssaExternal),
            _ => None,
        }
    }
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkKind::Transit => write!(f, "transit network"),
            LinkKind::Stub => write!(f, "stub network"),
            LinkKind::PointToPoint => write!(f, "point-to-point"),
            LinkKind::VirtualLink => write!(f, "virtual link"),
            LinkKind::External => write!(f, "external"),
            LinkKind::NssaExternal => write!(f, "nssa-external"),
        }
    }
}

// ===== impl Advertisement =====

impl Advertisement {
    // Returns the identity used to match router links: the interface address
    // if present, the link-state ID otherwise.
    pub fn key(&self) -> String {
        let key = if self.interface_address.trim().is_empty() {
            &self.link_state_id
        } else {
            &self.interface_address
        };
        normalize(key)
    }

    // Returns the identity used to match external prefixes.
    pub fn prefix_key(&self) -> String {
        format!(
            "{}/{}",
            normalize(&self.link_state_id),
            self.prefix_length.trim()
        )
    }
}

// ===== global functions =====

pub(crate) fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

// ===== unit tests =====
