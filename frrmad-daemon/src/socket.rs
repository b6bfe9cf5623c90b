//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::{Buf, BufMut, BytesMut};
use frrmad_utils::task::Task;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tracing::{Instrument, debug, debug_span, trace, warn};

use crate::daemon::State;

// Largest request or response accepted on the wire.
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

const FRAME_HDR_SIZE: usize = 4;

// Unix-socket server answering queries about the latest analysis and the
// data it was derived from.
//
// Each frame is a 4-byte little-endian length followed by a JSON document.
#[derive(Debug)]
pub struct QueryServer {
    path: PathBuf,
    _task: Task<()>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Request {
    pub service: String,
    pub command: String,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Response {
    pub status: ResponseStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

// Identity of the local router.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RouterData<'a> {
    hostname: &'a str,
    frr_version: &'a str,
    router_id: Option<String>,
}

// ===== impl QueryServer =====

impl QueryServer {
    pub(crate) fn start(
        path: &Path,
        state: Arc<State>,
    ) -> io::Result<QueryServer> {
        // Remove a stale socket left by a previous instance.
        let _ = std::fs::remove_file(path);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let listener = UnixListener::bind(path)?;
        debug!(path = %path.display(), "query server listening");

        let task = Task::spawn(
            async move {
                loop {
                    match listener.accept().await {
                        Ok((stream, _)) => {
                            let state = state.clone();
                            let mut task = Task::spawn(
                                serve_client(stream, state).in_current_span(),
                            );
                            task.detach();
                        }
                        Err(error) => {
                            warn!(%error, "failed to accept connection");
                        }
                    }
                }
            }
            .instrument(debug_span!("query-server")),
        );

        Ok(QueryServer {
            path: path.to_owned(),
            _task: task,
        })
    }
}

impl Drop for QueryServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

// ===== impl Response =====

impl Response {
    fn success(message: impl Into<String>, data: Value) -> Response {
        Response {
            status: ResponseStatus::Success,
            message: message.into(),
            data: Some(data),
        }
    }

    fn error(message: impl Into<String>) -> Response {
        Response {
            status: ResponseStatus::Error,
            message: message.into(),
            data: None,
        }
    }
}

// ===== global functions =====

// Answers a single request.
pub fn process_request(state: &State, request: &Request) -> Response {
    let command = request.command.as_str();
    let result = match request.service.as_str() {
        "analysis" => process_analysis(state, command),
        "ospf" => process_ospf(state, command),
        "frr" => process_frr(state, command),
        service => {
            return Response::error(format!("unknown service: {service}"));
        }
    };

    match result {
        Some(Ok((message, data))) => Response::success(message, data),
        Some(Err(error)) => {
            Response::error(format!("failed to encode response: {error}"))
        }
        None => Response::error(format!("unknown command: {command}")),
    }
}

// Reads one frame. Returns `None` when the peer closed the connection
// cleanly.
pub async fn read_frame(
    stream: &mut UnixStream,
) -> io::Result<Option<BytesMut>> {
    let mut hdr = [0; FRAME_HDR_SIZE];
    match stream.read_exact(&mut hdr).await {
        Ok(_) => (),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
            return Ok(None);
        }
        Err(error) => return Err(error),
    }

    let len = (&hdr[..]).get_u32_le() as usize;
    if len > MAX_FRAME_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame too large ({len} bytes)"),
        ));
    }

    let mut buf = BytesMut::zeroed(len);
    stream.read_exact(&mut buf).await?;
    Ok(Some(buf))
}

pub async fn write_frame(
    stream: &mut UnixStream,
    data: &[u8],
) -> io::Result<()> {
    if data.len() > MAX_FRAME_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame too large ({} bytes)", data.len()),
        ));
    }

    let mut buf = BytesMut::with_capacity(FRAME_HDR_SIZE + data.len());
    buf.put_u32_le(data.len() as u32);
    buf.put_slice(data);
    stream.write_all(&buf).await
}

// ===== helper functions =====

async fn serve_client(mut stream: UnixStream, state: Arc<State>) {
    loop {
        let frame = match read_frame(&mut stream).await {
            Ok(Some(frame)) => frame,
            Ok(None) => return,
            Err(error) => {
                warn!(%error, "failed to read request");
                return;
            }
        };

        let response = match serde_json::from_slice::<Request>(&frame) {
            Ok(request) => {
                trace!(?request, "received request");
                process_request(&state, &request)
            }
            Err(error) => Response::error(format!("invalid request: {error}")),
        };

        let data = match serde_json::to_vec(&response) {
            Ok(data) => data,
            Err(error) => {
                warn!(%error, "failed to encode response");
                return;
            }
        };
        if let Err(error) = write_frame(&mut stream, &data).await {
            warn!(%error, "failed to send response");
            return;
        }
    }
}

type CommandResult = Option<serde_json::Result<(&'static str, Value)>>;

fn process_analysis(state: &State, command: &str) -> CommandResult {
    let analysis = state.analyzer.analysis();
    let result = match command {
        "router" => (
            "router-LSA anomalies",
            serde_json::to_value(&analysis.router_anomaly),
        ),
        "external" => (
            "AS-external-LSA anomalies",
            serde_json::to_value(&analysis.external_anomaly),
        ),
        "nssaExternal" => (
            "NSSA-LSA anomalies",
            serde_json::to_value(&analysis.nssa_external_anomaly),
        ),
        "lsdbToRib" => (
            "LSDB to RIB anomalies",
            serde_json::to_value(&analysis.lsdb_to_rib_anomaly),
        ),
        "ribToFib" => (
            "RIB to FIB anomalies",
            serde_json::to_value(&analysis.rib_to_fib_anomaly),
        ),
        "shouldParsedLsdb" => (
            "expected LSDB derived from the static configuration",
            serde_json::to_value(&*state.analyzer.parsed_data()),
        ),
        _ => return None,
    };
    Some(lift(result))
}

fn process_ospf(state: &State, command: &str) -> CommandResult {
    let snapshot = state.snapshot.load_full();
    let snapshot = snapshot.as_deref();
    let result = match command {
        "router" => (
            "self-originated router-LSAs",
            serde_json::to_value(
                snapshot.and_then(|s| s.ospf_router.as_ref()),
            ),
        ),
        "externalData" => (
            "self-originated AS-external-LSAs",
            serde_json::to_value(
                snapshot.and_then(|s| s.ospf_external.as_ref()),
            ),
        ),
        "nssaExternalData" => (
            "self-originated NSSA-LSAs",
            serde_json::to_value(
                snapshot.and_then(|s| s.ospf_nssa_external.as_ref()),
            ),
        ),
        "neighbors" => (
            "OSPF neighbors",
            serde_json::to_value(
                snapshot.and_then(|s| s.ospf_neighbors.as_ref()),
            ),
        ),
        "staticConfig" => (
            "static FRR configuration",
            serde_json::to_value(
                snapshot.and_then(|s| s.static_config.as_ref()),
            ),
        ),
        "peerMap" => (
            "point-to-point peer map",
            serde_json::to_value(&state.analyzer.parsed_data().peer_map),
        ),
        _ => return None,
    };
    Some(lift(result))
}

fn process_frr(state: &State, command: &str) -> CommandResult {
    let snapshot = state.snapshot.load_full();
    let snapshot = snapshot.as_deref();
    let result = match command {
        "routerData" => {
            let data = snapshot.and_then(|s| s.static_config.as_ref()).map(
                |config| RouterData {
                    hostname: &config.hostname,
                    frr_version: &config.frr_version,
                    router_id: config.router_id().map(|id| id.to_string()),
                },
            );
            ("router identity", serde_json::to_value(data))
        }
        "rib" => (
            "routing information base",
            serde_json::to_value(snapshot.and_then(|s| s.rib.as_ref())),
        ),
        _ => return None,
    };
    Some(lift(result))
}

fn lift(
    (message, data): (&'static str, serde_json::Result<Value>),
) -> serde_json::Result<(&'static str, Value)> {
    data.map(|data| (message, data))
}

// ===== unit tests =====
