//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use chrono::{DateTime, Utc};
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::config::StaticFrrConfiguration;
use crate::ospf::{
    OspfExternalData, OspfNeighbors, OspfNssaExternalData, OspfRouterData,
};
use crate::rib::Rib;

// Point-in-time view of the router, collected in a single poll cycle.
//
// Each part is optional: a part that couldn't be fetched or decoded is left
// empty, and consumers skip whatever depends on it.
#[derive(Clone, Debug, new)]
#[derive(Deserialize, Serialize)]
pub struct FrrSnapshot {
    pub timestamp: DateTime<Utc>,
    #[new(default)]
    pub static_config: Option<StaticFrrConfiguration>,
    #[new(default)]
    pub ospf_router: Option<OspfRouterData>,
    #[new(default)]
    pub ospf_external: Option<OspfExternalData>,
    #[new(default)]
    pub ospf_nssa_external: Option<OspfNssaExternalData>,
    #[new(default)]
    pub ospf_neighbors: Option<OspfNeighbors>,
    #[new(default)]
    pub rib: Option<Rib>,
}

// ===== impl FrrSnapshot =====

impl FrrSnapshot {
    pub fn hostname(&self) -> &str {
        self.static_config
            .as_ref()
            .map(|config| config.hostname.as_str())
            .unwrap_or_default()
    }
}
