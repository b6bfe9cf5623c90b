//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::Arc;

use arc_swap::ArcSwap;
use frrmad_utils::snapshot::FrrSnapshot;
use serde::{Deserialize, Serialize};

use crate::acl::{self, AccessLists, StaticList};
use crate::anomaly::{self, AnomalyAnalysis, AnomalyDetection};
use crate::debug::Debug;
use crate::lsdb::{InterAreaLsa, IntraAreaLsa};
use crate::peer::PeerInterfaceMap;
use crate::{is_state, rib, should_state};

/// Reconciliation orchestrator.
///
/// Owns the latest anomaly results and the intermediate data they were
/// derived from. Each call to [`Analyzer::analyze`] publishes complete new
/// snapshots, so readers on other tasks never observe a half-updated result.
#[derive(Debug, Default)]
pub struct Analyzer {
    analysis: ArcSwap<AnomalyAnalysis>,
    parsed: ArcSwap<ParsedAnalyzerData>,
}

// Should-state data computed during the last analysis cycle, exposed for
// introspection.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct ParsedAnalyzerData {
    pub should_router_lsdb: Option<IntraAreaLsa>,
    pub should_external_lsdb: Option<InterAreaLsa>,
    pub should_nssa_external_lsdb: Option<InterAreaLsa>,
    pub access_lists: AccessLists,
    pub static_list: StaticList,
    pub redistributed_static_list: StaticList,
    pub peer_map: PeerInterfaceMap,
}

// ===== impl Analyzer =====

impl Analyzer {
    pub fn new() -> Analyzer {
        Analyzer::default()
    }

    // Returns the latest anomaly results.
    pub fn analysis(&self) -> Arc<AnomalyAnalysis> {
        self.analysis.load_full()
    }

    // Returns the should-state data of the latest analysis cycle.
    pub fn parsed_data(&self) -> Arc<ParsedAnalyzerData> {
        self.parsed.load_full()
    }

    /// Runs one analysis cycle over the given snapshot.
    ///
    /// Per comparison domain:
    ///
    /// * without a should-state, no anomaly is possible and the domain is
    ///   reset;
    /// * without an is-state (the runtime data couldn't be fetched), the
    ///   previous result is kept;
    /// * otherwise the domain is recomputed from scratch.
    ///
    /// A snapshot lacking the static configuration is skipped altogether.
    pub fn analyze(&self, snapshot: &FrrSnapshot) {
        let Some(config) = &snapshot.static_config else {
            Debug::CycleSkip("static configuration unavailable").log();
            return;
        };
        let hostname = snapshot.hostname();
        Debug::CycleStart(hostname).log();

        let acls = acl::access_lists(config);
        let peer_map =
            PeerInterfaceMap::new(config, snapshot.ospf_neighbors.as_ref());
        let should_router = should_state::router_lsdb(config);
        let should_external = should_state::external_lsdb(config);
        let should_nssa_external = should_state::nssa_external_lsdb(config);

        let is_router = snapshot
            .ospf_router
            .as_ref()
            .map(|data| is_state::router_lsdb(data, hostname, &peer_map));
        let is_external = snapshot
            .ospf_external
            .as_ref()
            .map(|data| is_state::external_lsdb(data, hostname));
        let is_nssa_external = snapshot
            .ospf_nssa_external
            .as_ref()
            .map(|data| is_state::nssa_external_lsdb(data, hostname));

        let mut analysis = AnomalyAnalysis::clone(&self.analysis.load());
        update(
            "router",
            &mut analysis.router_anomaly,
            should_router.as_ref(),
            is_router.as_ref(),
            |should, is| anomaly::router_anomaly(&acls, should, is),
        );
        update(
            "external",
            &mut analysis.external_anomaly,
            should_external.as_ref(),
            is_external.as_ref(),
            anomaly::external_anomaly,
        );
        update(
            "nssa-external",
            &mut analysis.nssa_external_anomaly,
            should_nssa_external.as_ref(),
            is_nssa_external.as_ref(),
            anomaly::nssa_external_anomaly,
        );
        if let Some(rib) = &snapshot.rib {
            analysis.rib_to_fib_anomaly = rib::rib_to_fib(rib);
            log_anomaly("rib-to-fib", &analysis.rib_to_fib_anomaly);
            if let Some(is_router) = &is_router {
                analysis.lsdb_to_rib_anomaly =
                    rib::lsdb_to_rib(is_router, rib);
                log_anomaly("lsdb-to-rib", &analysis.lsdb_to_rib_anomaly);
            }
        }
        self.analysis.store(Arc::new(analysis));

        let static_list = acl::static_list(config);
        let redistributed_static_list =
            acl::redistributed_static_list(config, &acls);
        self.parsed.store(Arc::new(ParsedAnalyzerData {
            should_router_lsdb: should_router,
            should_external_lsdb: should_external,
            should_nssa_external_lsdb: should_nssa_external,
            access_lists: acls,
            static_list,
            redistributed_static_list,
            peer_map,
        }));
    }
}

// ===== helper functions =====

fn update<T>(
    domain: &str,
    result: &mut AnomalyDetection,
    should_state: Option<&T>,
    is_state: Option<&T>,
    diff: impl FnOnce(&T, &T) -> AnomalyDetection,
) {
    match (should_state, is_state) {
        (None, _) => {
            Debug::DomainReset(domain).log();
            *result = AnomalyDetection::default();
        }
        (Some(_), None) => {
            Debug::DomainKeep(domain).log();
        }
        (Some(should_state), Some(is_state)) => {
            *result = diff(should_state, is_state);
            log_anomaly(domain, result);
        }
    }
}

fn log_anomaly(domain: &str, result: &AnomalyDetection) {
    if result.has_anomalies() {
        Debug::AnomalyDetect(domain, result).log();
    }
}
