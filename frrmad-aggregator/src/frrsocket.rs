//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_new::new;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

use crate::debug::Debug;
use crate::error::{Error, IoError};

pub const OSPFD_VTY: &str = "ospfd.vty";
pub const ZEBRA_VTY: &str = "zebra.vty";

// Largest response accepted from a daemon.
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

const READ_BUF_SIZE: usize = 4096;

// Client of the FRR daemons' vty sockets.
//
// Commands and responses are NUL-terminated. A command is preceded by
// "enable" so that privileged `show` commands are accepted.
#[derive(Clone, Debug, new)]
pub struct FrrSocket {
    pub dir: PathBuf,
    pub timeout: Duration,
}

// ===== impl FrrSocket =====

impl FrrSocket {
    pub async fn exec_ospf_cmd(&self, cmd: &str) -> Result<Vec<u8>, Error> {
        self.exec_cmd(OSPFD_VTY, cmd).await
    }

    pub async fn exec_zebra_cmd(&self, cmd: &str) -> Result<Vec<u8>, Error> {
        self.exec_cmd(ZEBRA_VTY, cmd).await
    }

    async fn exec_cmd(&self, vty: &str, cmd: &str) -> Result<Vec<u8>, Error> {
        let path = self.dir.join(vty);
        Debug::VtyCommand(&path, cmd).log();

        let response = tokio::time::timeout(self.timeout, exchange(&path, cmd))
            .await
            .map_err(|_| IoError::Timeout(path.clone()))??;
        Debug::VtyResponse(&path, response.len()).log();
        Ok(response)
    }
}

// ===== helper functions =====

async fn exchange(path: &Path, cmd: &str) -> Result<Vec<u8>, IoError> {
    let mut stream = UnixStream::connect(path)
        .await
        .map_err(|error| IoError::Connect(path.to_owned(), error))?;
    let mut buf = [0; READ_BUF_SIZE];

    // Switch to enable mode first.
    stream
        .write_all(b"enable\0")
        .await
        .map_err(IoError::Write)?;
    stream.read(&mut buf).await.map_err(IoError::Read)?;

    let mut request = Vec::with_capacity(cmd.len() + 1);
    request.extend_from_slice(cmd.as_bytes());
    request.push(0);
    stream.write_all(&request).await.map_err(IoError::Write)?;

    // The daemon signals the end of the response with a NUL byte.
    let mut response = vec![];
    loop {
        let n = stream.read(&mut buf).await.map_err(IoError::Read)?;
        if n == 0 {
            return Err(IoError::Read(std::io::ErrorKind::UnexpectedEof.into()));
        }
        response.extend_from_slice(&buf[..n]);
        if buf[n - 1] == 0 {
            break;
        }
        if response.len() > MAX_RESPONSE_SIZE {
            return Err(IoError::ResponseTooLarge(path.to_owned()));
        }
    }
    while response.last() == Some(&0) {
        response.pop();
    }

    Ok(response)
}
