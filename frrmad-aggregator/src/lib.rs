//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

//! Collection of FRR state.
//!
//! The aggregator talks to the FRR daemons over their vty sockets, decodes
//! the JSON output of the relevant `show` commands, parses the static
//! configuration text and bundles everything into an [`FrrSnapshot`].
//!
//! [`FrrSnapshot`]: frrmad_utils::snapshot::FrrSnapshot

#![warn(rust_2018_idioms)]

pub mod collector;
pub mod debug;
pub mod error;
pub mod fetcher;
pub mod frrsocket;
pub mod parser;
