//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

//! Should-state / is-state reconciliation of an OSPF router's link-state
//! database.
//!
//! The analyzer derives the advertisements a router is expected to originate
//! from its static FRR configuration (the should-state), derives the
//! advertisements it actually originates from the runtime LSDB (the
//! is-state), and compares both per LSA type to report missing, superfluous
//! and duplicate advertisements.

pub mod acl;
pub mod advertisement;
pub mod analyzer;
pub mod anomaly;
pub mod debug;
pub mod error;
pub mod is_state;
pub mod lsdb;
pub mod peer;
pub mod rib;
pub mod should_state;
