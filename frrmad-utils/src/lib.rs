//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

#![warn(rust_2018_idioms)]

pub mod config;
pub mod ip;
pub mod ospf;
pub mod rib;
pub mod snapshot;
pub mod task;

pub type Receiver<T> = tokio::sync::mpsc::Receiver<T>;
