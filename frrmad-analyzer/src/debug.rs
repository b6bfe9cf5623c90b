//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use tracing::{debug, debug_span};

use crate::advertisement::Advertisement;
use crate::anomaly::AnomalyDetection;
use crate::lsdb::LsaType;

// Analyzer debug messages.
#[derive(Debug)]
pub enum Debug<'a> {
    // Analysis cycle
    CycleStart(&'a str),
    CycleSkip(&'static str),
    // LSDB construction
    ShouldStateBuild(LsaType, usize),
    ShouldStateAbsent(LsaType),
    IsStateBuild(LsaType, usize),
    PeerResolve(&'a str, &'a Ipv4Addr),
    // Comparison
    AclExclude(&'a Advertisement, &'a str),
    AnomalyDetect(&'a str, &'a AnomalyDetection),
    DomainReset(&'a str),
    DomainKeep(&'a str),
}

// ===== impl Debug =====

impl Debug<'_> {
    pub(crate) fn log(&self) {
        match self {
            Debug::CycleStart(hostname) => {
                debug!(%hostname, "{}", self);
            }
            Debug::CycleSkip(reason) => {
                debug!(%reason, "{}", self);
            }
            Debug::ShouldStateBuild(lsa_type, links)
            | Debug::IsStateBuild(lsa_type, links) => {
                debug_span!("lsdb", %lsa_type).in_scope(|| {
                    debug!(%links, "{}", self);
                })
            }
            Debug::ShouldStateAbsent(lsa_type) => {
                debug_span!("lsdb", %lsa_type).in_scope(|| {
                    debug!("{}", self);
                })
            }
            Debug::PeerResolve(router_id, address) => {
                debug_span!("neighbor", %router_id).in_scope(|| {
                    debug!(%address, "{}", self);
                })
            }
            Debug::AclExclude(adv, acl) => {
                debug!(
                    address = %adv.interface_address,
                    link_type = %adv.link_type,
                    %acl,
                    "{}", self
                );
            }
            Debug::AnomalyDetect(domain, anomaly) => {
                debug_span!("anomaly", %domain).in_scope(|| {
                    debug!(
                        missing = anomaly.missing_entries.len(),
                        superfluous = anomaly.superfluous_entries.len(),
                        duplicate = anomaly.duplicate_entries.len(),
                        "{}", self
                    );
                })
            }
            Debug::DomainReset(domain) | Debug::DomainKeep(domain) => {
                debug_span!("anomaly", %domain).in_scope(|| {
                    debug!("{}", self);
                })
            }
        }
    }
}

impl std::fmt::Display for Debug<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Debug::CycleStart(..) => {
                write!(f, "starting analysis cycle")
            }
            Debug::CycleSkip(..) => {
                write!(f, "skipping analysis cycle")
            }
            Debug::ShouldStateBuild(..) => {
                write!(f, "should-state built")
            }
            Debug::ShouldStateAbsent(..) => {
                write!(f, "no should-state for this LSA type")
            }
            Debug::IsStateBuild(..) => {
                write!(f, "is-state built")
            }
            Debug::PeerResolve(..) => {
                write!(f, "resolved point-to-point peer")
            }
            Debug::AclExclude(..) => {
                write!(f, "advertisement excluded by access-list")
            }
            Debug::AnomalyDetect(..) => {
                write!(f, "anomalies detected")
            }
            Debug::DomainReset(..) => {
                write!(f, "no should-state, clearing previous result")
            }
            Debug::DomainKeep(..) => {
                write!(f, "no is-state, keeping previous result")
            }
        }
    }
}
