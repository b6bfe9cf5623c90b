//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::path::Path;

use frrmad_utils::snapshot::FrrSnapshot;
use tracing::{debug, debug_span};

// Aggregator debug messages.
#[derive(Debug)]
pub enum Debug<'a> {
    VtyCommand(&'a Path, &'a str),
    VtyResponse(&'a Path, usize),
    ConfigParsed(&'a str, usize),
    SnapshotCollected(&'a FrrSnapshot),
}

// ===== impl Debug =====

impl Debug<'_> {
    pub(crate) fn log(&self) {
        match self {
            Debug::VtyCommand(path, cmd) => {
                debug_span!("vty", path = %path.display()).in_scope(|| {
                    debug!(%cmd, "{}", self);
                })
            }
            Debug::VtyResponse(path, len) => {
                debug_span!("vty", path = %path.display()).in_scope(|| {
                    debug!(%len, "{}", self);
                })
            }
            Debug::ConfigParsed(hostname, interfaces) => {
                debug!(%hostname, %interfaces, "{}", self);
            }
            Debug::SnapshotCollected(snapshot) => {
                debug!(
                    hostname = %snapshot.hostname(),
                    static_config = snapshot.static_config.is_some(),
                    router = snapshot.ospf_router.is_some(),
                    external = snapshot.ospf_external.is_some(),
                    nssa_external = snapshot.ospf_nssa_external.is_some(),
                    neighbors = snapshot.ospf_neighbors.is_some(),
                    rib = snapshot.rib.is_some(),
                    "{}", self
                );
            }
        }
    }
}

impl std::fmt::Display for Debug<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Debug::VtyCommand(..) => {
                write!(f, "sending command")
            }
            Debug::VtyResponse(..) => {
                write!(f, "received response")
            }
            Debug::ConfigParsed(..) => {
                write!(f, "static configuration parsed")
            }
            Debug::SnapshotCollected(..) => {
                write!(f, "snapshot collected")
            }
        }
    }
}
