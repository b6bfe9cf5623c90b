//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use chrono::Utc;
use derive_new::new;
use frrmad_utils::snapshot::FrrSnapshot;

use crate::debug::Debug;
use crate::error::Error;
use crate::fetcher::{self, ConfigSource};
use crate::frrsocket::FrrSocket;

// Builds one snapshot of the router per poll.
#[derive(Debug, new)]
pub struct Collector {
    socket: FrrSocket,
    config_source: ConfigSource,
}

// ===== impl Collector =====

impl Collector {
    // Runs every fetch concurrently. A part that can't be fetched or decoded
    // is left empty.
    pub async fn collect(&self) -> FrrSnapshot {
        let (
            static_config,
            ospf_router,
            ospf_external,
            ospf_nssa_external,
            ospf_neighbors,
            rib,
        ) = tokio::join!(
            fetcher::fetch_static_config(&self.config_source),
            fetcher::fetch_ospf_router_data(&self.socket),
            fetcher::fetch_ospf_external_data(&self.socket),
            fetcher::fetch_ospf_nssa_external_data(&self.socket),
            fetcher::fetch_ospf_neighbors(&self.socket),
            fetcher::fetch_rib(&self.socket),
        );

        let mut snapshot = FrrSnapshot::new(Utc::now());
        snapshot.static_config = fetched(static_config);
        snapshot.ospf_router = fetched(ospf_router);
        snapshot.ospf_external = fetched(ospf_external);
        snapshot.ospf_nssa_external = fetched(ospf_nssa_external);
        snapshot.ospf_neighbors = fetched(ospf_neighbors);
        snapshot.rib = fetched(rib);
        Debug::SnapshotCollected(&snapshot).log();

        snapshot
    }
}

// ===== helper functions =====

fn fetched<T>(result: Result<T, Error>) -> Option<T> {
    result.map_err(|error| error.log()).ok()
}
