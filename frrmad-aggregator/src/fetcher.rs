//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::path::PathBuf;

use frrmad_utils::config::StaticFrrConfiguration;
use frrmad_utils::ospf::{
    OspfExternalData, OspfNeighbors, OspfNssaExternalData, OspfRouterData,
};
use frrmad_utils::rib::Rib;
use serde::de::DeserializeOwned;
use tokio::process::Command;

use crate::error::{Error, IoError};
use crate::frrsocket::FrrSocket;
use crate::parser;

pub const CMD_OSPF_ROUTER: &str = "show ip ospf data router self json";
pub const CMD_OSPF_EXTERNAL: &str = "show ip ospf data external self json";
pub const CMD_OSPF_NSSA_EXTERNAL: &str =
    "show ip ospf data nssa-external self json";
pub const CMD_OSPF_NEIGHBORS: &str = "show ip ospf neighbor json";
pub const CMD_RIB: &str = "show ip route json";
pub const CMD_RUNNING_CONFIG: &str = "show running-config";

// Where the static configuration is read from.
#[derive(Clone, Debug)]
pub enum ConfigSource {
    // Output of `vtysh -c "show running-config"`.
    Vtysh,
    // FRR configuration file.
    File(PathBuf),
}

// ===== global functions =====

pub async fn fetch_ospf_router_data(
    socket: &FrrSocket,
) -> Result<OspfRouterData, Error> {
    let output = socket.exec_ospf_cmd(CMD_OSPF_ROUTER).await?;
    decode("router-LSA", &output)
}

pub async fn fetch_ospf_external_data(
    socket: &FrrSocket,
) -> Result<OspfExternalData, Error> {
    let output = socket.exec_ospf_cmd(CMD_OSPF_EXTERNAL).await?;
    decode("AS-external-LSA", &output)
}

pub async fn fetch_ospf_nssa_external_data(
    socket: &FrrSocket,
) -> Result<OspfNssaExternalData, Error> {
    let output = socket.exec_ospf_cmd(CMD_OSPF_NSSA_EXTERNAL).await?;
    decode("NSSA-LSA", &output)
}

pub async fn fetch_ospf_neighbors(
    socket: &FrrSocket,
) -> Result<OspfNeighbors, Error> {
    let output = socket.exec_ospf_cmd(CMD_OSPF_NEIGHBORS).await?;
    decode("neighbors", &output)
}

pub async fn fetch_rib(socket: &FrrSocket) -> Result<Rib, Error> {
    let output = socket.exec_zebra_cmd(CMD_RIB).await?;
    decode("rib", &output)
}

pub async fn fetch_static_config(
    source: &ConfigSource,
) -> Result<StaticFrrConfiguration, Error> {
    let text = match source {
        ConfigSource::Vtysh => {
            let output = Command::new("vtysh")
                .arg("-c")
                .arg(CMD_RUNNING_CONFIG)
                .output()
                .await
                .map_err(IoError::Vtysh)?;
            if !output.status.success() {
                let error = std::io::Error::other(format!(
                    "vtysh exited with {}",
                    output.status
                ));
                return Err(IoError::Vtysh(error).into());
            }
            String::from_utf8_lossy(&output.stdout).into_owned()
        }
        ConfigSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|error| IoError::ConfigRead(path.clone(), error))?,
    };

    Ok(parser::parse_static_config(&text))
}

// Decodes the JSON output of a `show` command.
pub fn decode<T: DeserializeOwned>(
    output: &'static str,
    data: &[u8],
) -> Result<T, Error> {
    serde_json::from_slice(data)
        .map_err(|error| Error::JsonDecode(output, error))
}
