//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

//! Anomaly diff engine.
//!
//! Every comparison indexes both sides by an identity key and reports:
//!
//! * missing: keys expected by the should-state but not advertised;
//! * superfluous: keys advertised but not expected;
//! * duplicate: keys advertised more than once (one entry per key).
//!
//! Results are recomputed from scratch on every call.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

use crate::acl::{AccessLists, is_excluded_by_access_list};
use crate::advertisement::{Advertisement, LinkKind};
use crate::lsdb::{InterAreaLsa, IntraAreaLsa};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct AnomalyDetection {
    pub has_over_advertised_prefixes: bool,
    pub has_under_advertised_prefixes: bool,
    pub has_duplicate_prefixes: bool,
    // No detector populates this flag yet.
    pub has_misconfigured_prefixes: bool,
    pub superfluous_entries: Vec<Advertisement>,
    pub missing_entries: Vec<Advertisement>,
    pub duplicate_entries: Vec<Advertisement>,
}

// Latest anomaly results, one per comparison domain.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct AnomalyAnalysis {
    pub router_anomaly: AnomalyDetection,
    pub external_anomaly: AnomalyDetection,
    pub nssa_external_anomaly: AnomalyDetection,
    pub rib_to_fib_anomaly: AnomalyDetection,
    pub lsdb_to_rib_anomaly: AnomalyDetection,
}

// ===== impl AnomalyDetection =====

impl AnomalyDetection {
    pub fn new(
        missing_entries: Vec<Advertisement>,
        superfluous_entries: Vec<Advertisement>,
        duplicate_entries: Vec<Advertisement>,
    ) -> AnomalyDetection {
        AnomalyDetection {
            has_over_advertised_prefixes: !superfluous_entries.is_empty(),
            has_under_advertised_prefixes: !missing_entries.is_empty(),
            has_duplicate_prefixes: !duplicate_entries.is_empty(),
            has_misconfigured_prefixes: false,
            superfluous_entries,
            missing_entries,
            duplicate_entries,
        }
    }

    pub fn has_anomalies(&self) -> bool {
        self.has_over_advertised_prefixes
            || self.has_under_advertised_prefixes
            || self.has_duplicate_prefixes
            || self.has_misconfigured_prefixes
    }
}

// ===== global functions =====

/// Compares router-LSA links.
///
/// Point-to-point links are left out on both sides. Missing candidates
/// excluded by an access-list deny entry are suppressed; superfluous entries
/// are always reported.
pub fn router_anomaly(
    acls: &AccessLists,
    should_state: &IntraAreaLsa,
    is_state: &IntraAreaLsa,
) -> AnomalyDetection {
    let compared = |adv: &&Advertisement| {
        adv.link_type != LinkKind::PointToPoint
            && !adv.key().is_empty()
    };
    compare(
        should_state.links().filter(compared).map(|adv| (adv.key(), adv)),
        is_state.links().filter(compared).map(|adv| (adv.key(), adv)),
        |adv| is_excluded_by_access_list(adv, acls),
    )
}

/// Compares AS-external prefixes, keyed by link-state ID and prefix length.
pub fn external_anomaly(
    should_state: &InterAreaLsa,
    is_state: &InterAreaLsa,
) -> AnomalyDetection {
    compare(
        should_state.links().map(|adv| (adv.prefix_key(), adv)),
        is_state.links().map(|adv| (adv.prefix_key(), adv)),
        |_| false,
    )
}

/// Compares NSSA-external prefixes. Keys are scoped per area: the same
/// prefix expected in one NSSA and advertised in another is reported as both
/// missing and superfluous.
pub fn nssa_external_anomaly(
    should_state: &InterAreaLsa,
    is_state: &InterAreaLsa,
) -> AnomalyDetection {
    compare(area_keyed(should_state), area_keyed(is_state), |_| false)
}

pub(crate) fn compare<'a, K: Ord>(
    should_state: impl IntoIterator<Item = (K, &'a Advertisement)>,
    is_state: impl IntoIterator<Item = (K, &'a Advertisement)>,
    excluded: impl Fn(&Advertisement) -> bool,
) -> AnomalyDetection {
    let mut should_map = BTreeMap::new();
    for (key, adv) in should_state {
        should_map.entry(key).or_insert(adv);
    }

    let mut is_map: BTreeMap<K, (&Advertisement, usize)> = BTreeMap::new();
    for (key, adv) in is_state {
        match is_map.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert((adv, 1));
            }
            Entry::Occupied(mut entry) => {
                entry.get_mut().1 += 1;
            }
        }
    }

    let missing = should_map
        .iter()
        .filter(|&(key, adv)| !is_map.contains_key(key) && !excluded(*adv))
        .map(|(_, adv)| (*adv).clone())
        .collect();
    let superfluous = is_map
        .iter()
        .filter(|(key, _)| !should_map.contains_key(*key))
        .map(|(_, (adv, _))| (*adv).clone())
        .collect();
    let duplicate = is_map
        .values()
        .filter(|(_, count)| *count > 1)
        .map(|(adv, _)| (*adv).clone())
        .collect();

    AnomalyDetection::new(missing, superfluous, duplicate)
}

// ===== helper functions =====

fn area_keyed(
    lsdb: &InterAreaLsa,
) -> impl Iterator<Item = ((String, String), &Advertisement)> {
    lsdb.areas.iter().flat_map(|area| {
        area.links
            .iter()
            .map(|adv| ((area.area_name.clone(), adv.prefix_key()), adv))
    })
}

// ===== unit tests =====
