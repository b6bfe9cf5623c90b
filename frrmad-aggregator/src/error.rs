//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::path::PathBuf;

use tracing::{error, warn};

// Aggregator errors.
#[derive(Debug)]
pub enum Error {
    IoError(IoError),
    JsonDecode(&'static str, serde_json::Error),
    ConfigParse(ConfigParseError),
}

// Aggregator I/O errors.
#[derive(Debug)]
pub enum IoError {
    Connect(PathBuf, std::io::Error),
    Read(std::io::Error),
    Write(std::io::Error),
    Timeout(PathBuf),
    ResponseTooLarge(PathBuf),
    ConfigRead(PathBuf, std::io::Error),
    Vtysh(std::io::Error),
}

// Malformed static configuration line.
#[derive(Debug)]
pub struct ConfigParseError {
    pub line_no: usize,
    pub line: String,
    pub reason: &'static str,
}

// ===== impl Error =====

impl Error {
    pub fn log(&self) {
        match self {
            Error::IoError(error) => {
                error.log();
            }
            Error::JsonDecode(output, error) => {
                warn!(%output, error = %with_source(error), "{}", self);
            }
            Error::ConfigParse(error) => {
                warn!(
                    line_no = error.line_no,
                    line = %error.line,
                    reason = error.reason,
                    "{}", self
                );
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IoError(error) => error.fmt(f),
            Error::JsonDecode(..) => {
                write!(f, "failed to decode command output")
            }
            Error::ConfigParse(..) => {
                write!(f, "skipping malformed configuration line")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(error) => Some(error),
            Error::JsonDecode(_, error) => Some(error),
            _ => None,
        }
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

// ===== impl IoError =====

impl IoError {
    pub(crate) fn log(&self) {
        match self {
            IoError::Connect(path, error)
            | IoError::ConfigRead(path, error) => {
                warn!(
                    path = %path.display(),
                    error = %with_source(error),
                    "{}", self
                );
            }
            IoError::Read(error) | IoError::Write(error) => {
                warn!(error = %with_source(error), "{}", self);
            }
            IoError::Timeout(path) | IoError::ResponseTooLarge(path) => {
                warn!(path = %path.display(), "{}", self);
            }
            IoError::Vtysh(error) => {
                error!(error = %with_source(error), "{}", self);
            }
        }
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::Connect(..) => {
                write!(f, "failed to connect to vty socket")
            }
            IoError::Read(..) => {
                write!(f, "failed to read from vty socket")
            }
            IoError::Write(..) => {
                write!(f, "failed to write to vty socket")
            }
            IoError::Timeout(..) => {
                write!(f, "vty command timed out")
            }
            IoError::ResponseTooLarge(..) => {
                write!(f, "vty response too large")
            }
            IoError::ConfigRead(..) => {
                write!(f, "failed to read configuration file")
            }
            IoError::Vtysh(..) => {
                write!(f, "failed to run vtysh")
            }
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::Connect(_, error)
            | IoError::ConfigRead(_, error)
            | IoError::Read(error)
            | IoError::Write(error)
            | IoError::Vtysh(error) => Some(error),
            IoError::Timeout(..) | IoError::ResponseTooLarge(..) => None,
        }
    }
}

// ===== global functions =====

fn with_source<E: std::error::Error>(error: E) -> String {
    if let Some(source) = error.source() {
        format!("{} ({})", error, with_source(source))
    } else {
        error.to_string()
    }
}
