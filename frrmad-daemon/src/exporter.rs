//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

//! Prometheus exporter.
//!
//! Publishes the latest anomaly analysis, along with a few gauges describing
//! the self-originated OSPF LSDB, on an HTTP `/metrics` endpoint. Gauges are
//! refreshed by their own poll loop from the state shared with the analyzer.

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use frrmad_analyzer::advertisement::Advertisement;
use frrmad_analyzer::anomaly::{AnomalyAnalysis, AnomalyDetection};
use frrmad_utils::ospf::Neighbor;
use frrmad_utils::snapshot::FrrSnapshot;
use frrmad_utils::task::IntervalTask;
use metrics::{describe_gauge, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use tracing::{debug, debug_span};

use crate::daemon::State;

const ANOMALY_DETAILS: &str = "ospf_anomaly_details";
const OVERADVERTISED_TOTAL: &str = "ospf_overadvertised_routes_total";
const UNADVERTISED_TOTAL: &str = "ospf_unadvertised_routes_total";
const DUPLICATE_TOTAL: &str = "ospf_duplicate_routes_total";
const RIB_TO_FIB_TOTAL: &str = "rib_to_fib_anomalies_total";
const LSDB_TO_RIB_TOTAL: &str = "lsdb_to_rib_anomalies_total";
const ROUTER_LINKS: &str = "frr_ospf_router_links_total";
const EXTERNAL_METRIC: &str = "frr_ospf_external_metric";
const NSSA_EXTERNAL_METRIC: &str = "frr_ospf_nssa_external_metric";
const NEIGHBOR_STATE: &str = "frr_ospf_neighbor_state";
const NEIGHBOR_UPTIME: &str = "frr_ospf_neighbor_uptime_seconds";

type Labels = Vec<(&'static str, String)>;

// A labeled gauge.
type Series = (&'static str, Labels);

#[derive(Debug)]
pub struct Exporter {
    _task: IntervalTask,
}

// Labeled series published by the previous update.
//
// Series that disappear from one update to the next are set to zero, so the
// scraper sees the anomaly go away instead of a stale value.
#[derive(Debug, Default)]
pub struct Metrics {
    published: BTreeSet<Series>,
}

// ===== impl Exporter =====

impl Exporter {
    // Installs the Prometheus recorder, starts its HTTP listener and the poll
    // loop refreshing the gauges. Must be called from within the runtime.
    pub(crate) fn start(
        address: SocketAddr,
        interval: Duration,
        state: Arc<State>,
    ) -> Result<Exporter, BuildError> {
        PrometheusBuilder::new()
            .with_http_listener(address)
            .install()?;
        describe();
        debug!(%address, "metrics exporter listening");

        let mut gauges = Metrics::default();
        let task = IntervalTask::new(interval, true, move || {
            let snapshot = state.snapshot.load_full();
            gauges.update(&state.analyzer.analysis(), snapshot.as_deref());
            async {}
        });

        Ok(Exporter { _task: task })
    }
}

// ===== impl Metrics =====

impl Metrics {
    // Publishes the given analysis and snapshot to the installed recorder.
    pub fn update(
        &mut self,
        analysis: &AnomalyAnalysis,
        snapshot: Option<&FrrSnapshot>,
    ) {
        let span = debug_span!("metrics");
        let _span_guard = span.enter();

        let mut current = vec![];
        anomaly_series(analysis, &mut current);
        if let Some(snapshot) = snapshot {
            lsdb_series(snapshot, &mut current);
        }

        let mut published = BTreeSet::new();
        for (series, value) in current {
            let (name, labels) = &series;
            gauge!(*name, labels).set(value);
            if !labels.is_empty() {
                published.insert(series);
            }
        }
        for (name, labels) in self.published.difference(&published) {
            gauge!(*name, labels).set(0.0);
        }
        debug!(series = published.len(), "metrics updated");
        self.published = published;
    }
}

// ===== helper functions =====

fn describe() {
    describe_gauge!(
        ANOMALY_DETAILS,
        "Detailed information about OSPF anomalies (1=present, 0=absent)"
    );
    describe_gauge!(
        OVERADVERTISED_TOTAL,
        "Total overadvertised routes detected across all sources"
    );
    describe_gauge!(
        UNADVERTISED_TOTAL,
        "Total unadvertised routes detected across all sources"
    );
    describe_gauge!(
        DUPLICATE_TOTAL,
        "Total duplicate routes detected across all sources"
    );
    describe_gauge!(RIB_TO_FIB_TOTAL, "Total RIB to FIB anomalies detected");
    describe_gauge!(LSDB_TO_RIB_TOTAL, "Total LSDB to RIB anomalies detected");
    describe_gauge!(ROUTER_LINKS, "Number of links in each router-LSA");
    describe_gauge!(EXTERNAL_METRIC, "Metric of each AS-external-LSA");
    describe_gauge!(NSSA_EXTERNAL_METRIC, "Metric of each NSSA-external-LSA");
    describe_gauge!(
        NEIGHBOR_STATE,
        "OSPF neighbor state (1=Full, 0.5=2-Way, 0=other)"
    );
    describe_gauge!(NEIGHBOR_UPTIME, "OSPF neighbor uptime in seconds");
}

fn anomaly_series(
    analysis: &AnomalyAnalysis,
    series: &mut Vec<(Series, f64)>,
) {
    let sources = [
        ("RouterAnomaly", &analysis.router_anomaly),
        ("ExternalAnomaly", &analysis.external_anomaly),
        ("NssaExternalAnomaly", &analysis.nssa_external_anomaly),
    ];

    let (mut over, mut under, mut duplicate) = (0, 0, 0);
    for (source, result) in sources {
        over += result.superfluous_entries.len();
        under += result.missing_entries.len();
        duplicate += result.duplicate_entries.len();

        let entries = [
            ("overadvertised", &result.superfluous_entries),
            ("unadvertised", &result.missing_entries),
            ("duplicate", &result.duplicate_entries),
        ];
        for (anomaly_type, advs) in entries {
            series.extend(advs.iter().map(|adv| {
                let labels = detail_labels(anomaly_type, source, adv);
                ((ANOMALY_DETAILS, labels), 1.0)
            }));
        }
    }

    series.push(((OVERADVERTISED_TOTAL, vec![]), over as f64));
    series.push(((UNADVERTISED_TOTAL, vec![]), under as f64));
    series.push(((DUPLICATE_TOTAL, vec![]), duplicate as f64));
    series.push((
        (RIB_TO_FIB_TOTAL, vec![]),
        mismatch_count(&analysis.rib_to_fib_anomaly),
    ));
    series.push((
        (LSDB_TO_RIB_TOTAL, vec![]),
        mismatch_count(&analysis.lsdb_to_rib_anomaly),
    ));
}

fn lsdb_series(snapshot: &FrrSnapshot, series: &mut Vec<(Series, f64)>) {
    if let Some(router) = &snapshot.ospf_router {
        for (area_id, lsas) in &router.router_states {
            for (lsa_id, lsa) in lsas {
                let labels = vec![
                    ("area_id", area_id.clone()),
                    ("link_state_id", lsa_id.clone()),
                ];
                series.push(((ROUTER_LINKS, labels), lsa.num_of_links as f64));
            }
        }
    }

    if let Some(external) = &snapshot.ospf_external {
        for (lsa_id, lsa) in &external.as_external_link_states {
            let labels = vec![
                ("link_state_id", lsa_id.clone()),
                ("metric_type", lsa.metric_type.clone()),
            ];
            series.push(((EXTERNAL_METRIC, labels), lsa.metric as f64));
        }
    }

    if let Some(nssa_external) = &snapshot.ospf_nssa_external {
        for (area_id, lsas) in &nssa_external.nssa_external_link_states {
            for (lsa_id, lsa) in lsas {
                let labels = vec![
                    ("area_id", area_id.clone()),
                    ("link_state_id", lsa_id.clone()),
                    ("metric_type", lsa.metric_type.clone()),
                ];
                series
                    .push(((NSSA_EXTERNAL_METRIC, labels), lsa.metric as f64));
            }
        }
    }

    if let Some(neighbors) = &snapshot.ospf_neighbors {
        for (neighbor_id, adjacencies) in &neighbors.neighbors {
            for nbr in adjacencies {
                let labels = vec![
                    ("neighbor_id", neighbor_id.clone()),
                    ("interface", nbr.ifname().to_owned()),
                ];
                let uptime = nbr.up_time_in_msec as f64 / 1000.0;
                series.push(((NEIGHBOR_STATE, labels.clone()), state(nbr)));
                series.push(((NEIGHBOR_UPTIME, labels), uptime));
            }
        }
    }
}

fn detail_labels(
    anomaly_type: &'static str,
    source: &'static str,
    adv: &Advertisement,
) -> Labels {
    vec![
        ("anomaly_type", anomaly_type.to_owned()),
        ("source", source.to_owned()),
        ("interface_address", adv.interface_address.clone()),
        ("link_state_id", adv.link_state_id.clone()),
        ("prefix_length", adv.prefix_length.clone()),
        ("link_type", adv.link_type.to_string()),
    ]
}

fn mismatch_count(result: &AnomalyDetection) -> f64 {
    (result.superfluous_entries.len() + result.missing_entries.len()) as f64
}

fn state(nbr: &Neighbor) -> f64 {
    if nbr.is_full() {
        1.0
    } else if nbr.nbr_state.starts_with("2-Way") {
        0.5
    } else {
        0.0
    }
}

// ===== unit tests =====
