//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::warn;

// Analyzer errors.
//
// None of these abort an analysis cycle: the offending entry is logged and
// skipped.
#[derive(Debug)]
pub enum Error {
    InvalidNetworkMask(String, String),
    UnknownLinkType(String),
}

// ===== impl Error =====

impl Error {
    pub(crate) fn log(&self) {
        match self {
            Error::InvalidNetworkMask(address, mask) => {
                warn!(%address, %mask, "{}", self);
            }
            Error::UnknownLinkType(link_type) => {
                warn!(%link_type, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidNetworkMask(..) => {
                write!(f, "invalid network mask")
            }
            Error::UnknownLinkType(..) => {
                write!(f, "unknown router link type")
            }
        }
    }
}

impl std::error::Error for Error {}
