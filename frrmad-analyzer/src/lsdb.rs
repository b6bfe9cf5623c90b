//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use frrmad_utils::config::AreaType;
use serde::{Deserialize, Serialize};

use crate::advertisement::Advertisement;

// Name of the synthetic area grouping AS-external advertisements.
pub const EXTERNAL_AREA: &str = "External";

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub enum LsaType {
    #[serde(rename = "router-LSA")]
    Router,
    #[serde(rename = "AS-external-LSA")]
    AsExternal,
    #[serde(rename = "NSSA-LSA")]
    NssaExternal,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum RouterType {
    #[serde(rename = "internal router")]
    Internal,
    #[serde(rename = "abr")]
    Abr,
    #[serde(rename = "asbr")]
    Asbr,
}

// Advertisements belonging to one OSPF area and one LSA type.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Area {
    pub area_name: String,
    pub lsa_type: LsaType,
    pub area_type: AreaType,
    pub links: Vec<Advertisement>,
}

// Router-LSA topology (type 1), grouped by area.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct IntraAreaLsa {
    pub hostname: String,
    pub router_id: String,
    pub router_type: RouterType,
    pub areas: Vec<Area>,
}

// External topology (types 5 and 7). Type-5 advertisements are grouped under
// the synthetic `EXTERNAL_AREA`, type-7 advertisements under their NSSA.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct InterAreaLsa {
    pub hostname: String,
    pub router_id: String,
    pub areas: Vec<Area>,
}

// ===== impl LsaType =====

impl std::fmt::Display for LsaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LsaType::Router => write!(f, "router-LSA"),
            LsaType::AsExternal => write!(f, "AS-external-LSA"),
            LsaType::NssaExternal => write!(f, "NSSA-LSA"),
        }
    }
}

// ===== impl RouterType =====

impl std::fmt::Display for RouterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterType::Internal => write!(f, "internal router"),
            RouterType::Abr => write!(f, "abr"),
            RouterType::Asbr => write!(f, "asbr"),
        }
    }
}

// ===== impl Area =====

impl Area {
    pub(crate) fn new(
        area_name: impl Into<String>,
        lsa_type: LsaType,
        area_type: AreaType,
    ) -> Area {
        Area {
            area_name: area_name.into(),
            lsa_type,
            area_type,
            links: Vec::new(),
        }
    }
}

// ===== impl IntraAreaLsa =====

impl IntraAreaLsa {
    pub fn area(&self, area_name: &str) -> Option<&Area> {
        self.areas.iter().find(|area| area.area_name == area_name)
    }

    pub fn links(&self) -> impl Iterator<Item = &Advertisement> {
        self.areas.iter().flat_map(|area| area.links.iter())
    }

    pub fn link_count(&self) -> usize {
        self.areas.iter().map(|area| area.links.len()).sum()
    }
}

// ===== impl InterAreaLsa =====

impl InterAreaLsa {
    pub fn area(&self, area_name: &str) -> Option<&Area> {
        self.areas.iter().find(|area| area.area_name == area_name)
    }

    pub fn links(&self) -> impl Iterator<Item = &Advertisement> {
        self.areas.iter().flat_map(|area| area.links.iter())
    }

    pub fn link_count(&self) -> usize {
        self.areas.iter().map(|area| area.links.len()).sum()
    }
}
