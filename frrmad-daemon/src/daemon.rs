//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use frrmad_aggregator::collector::Collector;
use frrmad_aggregator::frrsocket::FrrSocket;
use frrmad_analyzer::analyzer::Analyzer;
use frrmad_utils::Receiver;
use frrmad_utils::snapshot::FrrSnapshot;
use frrmad_utils::task::IntervalTask;
use tracing::{debug, error, info, instrument};

use crate::config::Config;
use crate::exporter::Exporter;
use crate::socket::QueryServer;

// State shared between the poll loops, the query server and the metrics
// exporter.
#[derive(Debug, Default)]
pub struct State {
    // Latest snapshot collected from the FRR daemons.
    pub snapshot: ArcSwapOption<FrrSnapshot>,
    pub analyzer: Analyzer,
}

#[derive(Debug)]
pub struct Daemon {
    _aggregator: IntervalTask,
    _analyzer: Option<IntervalTask>,
    _server: Option<QueryServer>,
    _exporter: Option<Exporter>,
}

// ===== impl Daemon =====

impl Daemon {
    pub(crate) fn init(config: &Config) -> Daemon {
        let state = Arc::new(State::default());

        let socket = FrrSocket::new(
            config.frr.socket_dir.clone().into(),
            config.frr.command_timeout(),
        );
        let collector = Collector::new(socket, config.frr.config_source());
        let aggregator = aggregator_task(
            collector,
            Duration::from_secs(config.aggregator.poll_interval),
            state.clone(),
        );

        let analyzer = config.analyzer.enabled.then(|| {
            analyzer_task(
                Duration::from_secs(config.analyzer.poll_interval),
                state.clone(),
            )
        });

        let exporter = config.exporter.enabled.then(|| {
            match Exporter::start(
                config.exporter.address,
                Duration::from_secs(config.exporter.poll_interval),
                state.clone(),
            ) {
                Ok(exporter) => exporter,
                Err(error) => {
                    error!(address = %config.exporter.address, %error,
                        "failed to start metrics exporter");
                    std::process::exit(1);
                }
            }
        });

        let server = config.socket.enabled.then(|| {
            match QueryServer::start(config.socket.path.as_ref(), state) {
                Ok(server) => server,
                Err(error) => {
                    error!(path = %config.socket.path, %error,
                        "failed to start query server");
                    std::process::exit(1);
                }
            }
        });

        Daemon {
            _aggregator: aggregator,
            _analyzer: analyzer,
            _server: server,
            _exporter: exporter,
        }
    }

    // Runs until a termination signal is received. The poll loops and the
    // query server are stopped when the daemon is dropped.
    #[instrument(skip_all, "daemon")]
    pub(crate) async fn run(self, mut signal_rx: Receiver<()>) {
        let _ = signal_rx.recv().await;
        info!("shutting down");
    }
}

// ===== helper functions =====

fn aggregator_task(
    collector: Collector,
    interval: Duration,
    state: Arc<State>,
) -> IntervalTask {
    let collector = Arc::new(collector);
    IntervalTask::new(interval, true, move || {
        let collector = collector.clone();
        let state = state.clone();
        async move {
            let snapshot = collector.collect().await;
            state.snapshot.store(Some(Arc::new(snapshot)));
        }
    })
}

fn analyzer_task(interval: Duration, state: Arc<State>) -> IntervalTask {
    IntervalTask::new(interval, true, move || {
        let state = state.clone();
        async move {
            match state.snapshot.load_full() {
                Some(snapshot) => state.analyzer.analyze(&snapshot),
                None => debug!("no snapshot collected yet"),
            }
        }
    })
}
