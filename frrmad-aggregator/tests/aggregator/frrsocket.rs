//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::time::Duration;

use frrmad_aggregator::error::{Error, IoError};
use frrmad_aggregator::fetcher::{self, CMD_OSPF_NEIGHBORS, CMD_OSPF_ROUTER};
use frrmad_aggregator::frrsocket::{FrrSocket, MAX_RESPONSE_SIZE, OSPFD_VTY};
use maplit::btreemap;
use tokio::net::UnixListener;

use crate::{load_fixture, socket_dir, spawn_vty};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_exec_ospf_cmd() {
    let dir = socket_dir("exec-ospf-cmd");
    let router = load_fixture("r101", "router.json");
    let _vty = spawn_vty(
        &dir.join(OSPFD_VTY),
        btreemap! { CMD_OSPF_ROUTER => router.clone() },
    );

    let socket = FrrSocket::new(dir, TIMEOUT);
    let output = socket.exec_ospf_cmd(CMD_OSPF_ROUTER).await.unwrap();
    assert_eq!(output, router.as_bytes());

    let data = fetcher::fetch_ospf_router_data(&socket).await.unwrap();
    assert_eq!(data.router_id, "65.0.1.1");
    let links = data
        .router_states
        .values()
        .flat_map(|lsas| lsas.values())
        .map(|lsa| lsa.router_links.len())
        .sum::<usize>();
    assert_eq!(links, 10);
}

#[tokio::test]
async fn test_large_response() {
    let dir = socket_dir("large-response");
    let neighbors = load_fixture("r201", "neighbors.json");
    // Pad the response past a single read.
    let padded = format!("{}{}", neighbors, " ".repeat(20_000));
    let _vty = spawn_vty(
        &dir.join(OSPFD_VTY),
        btreemap! { CMD_OSPF_NEIGHBORS => padded },
    );

    let socket = FrrSocket::new(dir, TIMEOUT);
    let data = fetcher::fetch_ospf_neighbors(&socket).await.unwrap();
    assert_eq!(data.neighbors.len(), 3);
}

#[tokio::test]
async fn test_oversized_response() {
    let dir = socket_dir("oversized-response");
    let _vty = spawn_vty(
        &dir.join(OSPFD_VTY),
        btreemap! { CMD_OSPF_ROUTER => " ".repeat(MAX_RESPONSE_SIZE + 1) },
    );

    let socket = FrrSocket::new(dir, TIMEOUT);
    let error = socket.exec_ospf_cmd(CMD_OSPF_ROUTER).await.unwrap_err();
    assert!(matches!(error, Error::IoError(IoError::ResponseTooLarge(..))));
}

#[tokio::test]
async fn test_missing_socket() {
    let dir = socket_dir("missing-socket");

    let socket = FrrSocket::new(dir, TIMEOUT);
    let error = socket.exec_ospf_cmd(CMD_OSPF_ROUTER).await.unwrap_err();
    assert!(matches!(error, Error::IoError(IoError::Connect(..))));
}

#[tokio::test]
async fn test_silent_daemon() {
    let dir = socket_dir("silent-daemon");
    let listener = UnixListener::bind(dir.join(OSPFD_VTY)).unwrap();
    let _vty = tokio::spawn(async move {
        let mut streams = vec![];
        while let Ok((stream, _)) = listener.accept().await {
            streams.push(stream);
        }
    });

    let socket = FrrSocket::new(dir, Duration::from_millis(100));
    let error = socket.exec_ospf_cmd(CMD_OSPF_ROUTER).await.unwrap_err();
    assert!(matches!(error, Error::IoError(IoError::Timeout(..))));
}

#[tokio::test]
async fn test_unknown_command() {
    let dir = socket_dir("unknown-command");
    let _vty = spawn_vty(&dir.join(OSPFD_VTY), btreemap! {});

    let socket = FrrSocket::new(dir, TIMEOUT);
    let error = fetcher::fetch_ospf_router_data(&socket).await.unwrap_err();
    assert!(matches!(error, Error::JsonDecode("router-LSA", _)));
}
