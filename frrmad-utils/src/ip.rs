//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use ipnetwork::{IpNetworkError, Ipv4Network, ipv4_mask_to_prefix};

// Extension methods for Ipv4Addr.
pub trait Ipv4AddrExt {
    // Returns true if the address is an unnumbered interface identifier, as
    // reported by FRR for point-to-point links without an IP address
    // (0.0.0.0/8 carrying the ifindex).
    fn is_unnumbered(&self) -> bool;

    // Interprets the address as a dotted-decimal netmask and returns its
    // prefix length. Non-contiguous masks are rejected.
    fn mask_to_prefixlen(&self) -> Result<u8, IpNetworkError>;
}

// Extension methods for Ipv4Network.
pub trait Ipv4NetworkExt {
    const MAX_PREFIXLEN: u8;

    // Returns the network with all host bits cleared.
    fn apply_mask(&self) -> Ipv4Network;
}

// ===== impl Ipv4Addr =====

impl Ipv4AddrExt for Ipv4Addr {
    fn is_unnumbered(&self) -> bool {
        self.octets()[0] == 0
    }

    fn mask_to_prefixlen(&self) -> Result<u8, IpNetworkError> {
        ipv4_mask_to_prefix(*self)
    }
}

// ===== impl Ipv4Network =====

impl Ipv4NetworkExt for Ipv4Network {
    const MAX_PREFIXLEN: u8 = 32;

    fn apply_mask(&self) -> Ipv4Network {
        // Masking never changes the prefix length, so this can't fail.
        Ipv4Network::new(self.network(), self.prefix())
            .unwrap_or_else(|_| *self)
    }
}

// ===== global functions =====

// Parses a dotted-decimal netmask (e.g. "255.255.254.0") into a prefix
// length.
pub fn netmask_to_prefixlen(mask: &str) -> Option<u8> {
    mask.trim()
        .parse::<Ipv4Addr>()
        .ok()
        .and_then(|mask| mask.mask_to_prefixlen().ok())
}

// Returns the network address of the given address/length pair, or `None` if
// either part is invalid.
pub fn network_address(addr: &str, prefixlen: u8) -> Option<Ipv4Addr> {
    let addr = addr.trim().parse::<Ipv4Addr>().ok()?;
    let network = Ipv4Network::new(addr, prefixlen).ok()?;
    Some(network.apply_mask().ip())
}

// ===== unit tests =====
