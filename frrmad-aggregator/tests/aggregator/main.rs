//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

mod collector;
mod frrsocket;
mod parser;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinHandle;

//
// Helper functions.
//

fn fixture_path(router: &str, file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(router)
        .join(file)
}

fn load_fixture(router: &str, file: &str) -> String {
    let path = fixture_path(router, file);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|error| panic!("{}: {}", path.display(), error))
}

// Creates an empty per-test directory for vty sockets.
fn socket_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join(format!("frrmad-{}-{}", test, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// Reads a NUL-terminated message.
async fn read_message(stream: &mut UnixStream) -> String {
    let mut message = vec![];
    let mut buf = [0; 1024];
    loop {
        let n = stream.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        message.extend_from_slice(&buf[..n]);
        if buf[n - 1] == 0 {
            break;
        }
    }
    String::from_utf8_lossy(&message)
        .trim_end_matches('\0')
        .to_owned()
}

// Spawns a fake FRR daemon answering the given commands on a vty socket.
// Unknown commands are answered the way FRR does.
fn spawn_vty(
    path: &Path,
    responses: BTreeMap<&'static str, String>,
) -> JoinHandle<()> {
    let listener = UnixListener::bind(path).unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let responses = responses.clone();
            tokio::spawn(async move {
                let enable = read_message(&mut stream).await;
                assert_eq!(enable, "enable");
                stream.write_all(&[0; 4]).await.unwrap();

                let cmd = read_message(&mut stream).await;
                let response = responses
                    .get(cmd.as_str())
                    .cloned()
                    .unwrap_or_else(|| "% Unknown command.".to_owned());
                // Body and terminator are sent separately. The client may
                // hang up early.
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.write_all(&[0; 4]).await;
            });
        }
    })
}
