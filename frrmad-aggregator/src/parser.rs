//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

//! Static FRR configuration parser.
//!
//! Only the statements relevant to OSPF advertisement analysis are
//! recognized; everything else is silently ignored. Recognized statements
//! that fail to parse are logged along with their line number and skipped.

use std::net::Ipv4Addr;

use frrmad_utils::config::{
    AccessAction, AccessListDestination, AccessListItem, AreaType, Interface,
    InterfaceIpPrefix, OspfArea, OspfConfig, Redistribution, RouteMapEntry,
    StaticFrrConfiguration, StaticRoute,
};
use ipnetwork::Ipv4Network;

use crate::debug::Debug;
use crate::error::{ConfigParseError, Error};

// Sequence number increment for access-list entries without an explicit
// sequence number.
const ACL_SEQ_STEP: u32 = 5;

type ParseResult = Result<(), &'static str>;

// Configuration block the parser is currently in.
#[derive(Clone, Debug, Default)]
enum Context {
    #[default]
    Global,
    Interface(usize),
    RouterOspf,
    RouteMap(String, usize),
}

#[derive(Debug, Default)]
struct Parser {
    config: StaticFrrConfiguration,
    context: Context,
    // Interfaces configured with an interface-wide `ip ospf passive`.
    passive_interfaces: Vec<usize>,
}

// ===== impl Parser =====

impl Parser {
    fn parse_line(&mut self, words: &[&str]) -> ParseResult {
        match words {
            ["exit" | "end", ..] => {
                self.context = Context::Global;
            }
            ["hostname", hostname] => {
                self.context = Context::Global;
                self.config.hostname = hostname.to_string();
            }
            ["frr", "version", version, ..] => {
                self.context = Context::Global;
                self.config.frr_version = version.to_string();
            }
            ["interface", name, ..] => {
                self.parse_interface(name);
            }
            ["ip", "route", args @ ..] => {
                self.context = Context::Global;
                self.parse_static_route(args)?;
            }
            ["router", "ospf", ..] => {
                self.config.ospf_config.get_or_insert_with(Default::default);
                self.context = Context::RouterOspf;
            }
            // Any other routing protocol block.
            ["router", ..] => {
                self.context = Context::Global;
            }
            ["access-list", args @ ..] => {
                self.context = Context::Global;
                self.parse_access_list(args)?;
            }
            ["route-map", args @ ..] => {
                self.context = Context::Global;
                self.parse_route_map(args)?;
            }
            _ => match self.context.clone() {
                Context::Global => (),
                Context::Interface(idx) => {
                    self.parse_interface_line(idx, words)?;
                }
                Context::RouterOspf => {
                    self.parse_ospf_line(words)?;
                }
                Context::RouteMap(name, idx) => {
                    self.parse_route_map_line(&name, idx, words);
                }
            },
        }

        Ok(())
    }

    fn parse_interface(&mut self, name: &str) {
        let interfaces = &mut self.config.interfaces;
        let position = interfaces.iter().position(|iface| iface.name == name);
        let idx = match position {
            Some(idx) => idx,
            None => {
                interfaces.push(Interface {
                    name: name.to_owned(),
                    ..Default::default()
                });
                interfaces.len() - 1
            }
        };
        self.context = Context::Interface(idx);
    }

    fn parse_interface_line(
        &mut self,
        idx: usize,
        words: &[&str],
    ) -> ParseResult {
        let Parser {
            config,
            passive_interfaces,
            ..
        } = self;
        let iface = &mut config.interfaces[idx];

        match words {
            ["ip", "address", prefix] => {
                iface.ip_prefixes.push(InterfaceIpPrefix {
                    ip_prefix: parse_prefix(prefix)?,
                    peer: None,
                    passive: false,
                });
            }
            ["ip", "address", prefix, "peer", peer] => {
                iface.ip_prefixes.push(InterfaceIpPrefix {
                    ip_prefix: parse_prefix(prefix)?,
                    peer: Some(parse_prefix(peer)?),
                    passive: false,
                });
            }
            ["ip", "address", ..] => {
                return Err("invalid interface address");
            }
            ["ip", "ospf", "area", area] => {
                iface.area = Some(parse_area_id(area)?);
            }
            ["ip", "ospf", "passive"] => {
                passive_interfaces.push(idx);
            }
            ["ip", "ospf", "passive", addr] => {
                let addr = addr
                    .parse::<Ipv4Addr>()
                    .map_err(|_| "invalid passive address")?;
                let prefix = iface
                    .ip_prefixes
                    .iter_mut()
                    .find(|prefix| prefix.ip_prefix.ip() == addr)
                    .ok_or("passive address not configured on interface")?;
                prefix.passive = true;
            }
            ["ip", "ospf", "network", network_type] => {
                let network_type = network_type
                    .parse()
                    .map_err(|_| "invalid OSPF network type")?;
                iface.network_type = Some(network_type);
            }
            _ => (),
        }

        Ok(())
    }

    fn parse_static_route(&mut self, args: &[&str]) -> ParseResult {
        let [prefix, next_hop, ..] = args else {
            return Err("incomplete static route");
        };
        self.config.static_routes.push(StaticRoute {
            prefix: parse_prefix(prefix)?,
            next_hop: next_hop.to_string(),
        });
        Ok(())
    }

    fn parse_ospf_line(&mut self, words: &[&str]) -> ParseResult {
        let ospf = self
            .config
            .ospf_config
            .get_or_insert_with(OspfConfig::default);

        match words {
            ["ospf", "router-id", router_id] => {
                let router_id =
                    router_id.parse().map_err(|_| "invalid router-id")?;
                ospf.router_id = Some(router_id);
            }
            ["redistribute", route_type, args @ ..] => {
                let redist = parse_redistribution(route_type, args)?;
                ospf.redistribution.push(redist);
            }
            ["area", area_id, args @ ..] => {
                let area_id = parse_area_id(area_id)?;
                match args {
                    ["nssa", ..] => {
                        area_mut(ospf, area_id).area_type = AreaType::Nssa;
                    }
                    ["stub", ..] => {
                        area_mut(ospf, area_id).area_type = AreaType::Stub;
                    }
                    ["virtual-link", nbr_router_id, ..] => {
                        let nbr_router_id = nbr_router_id
                            .parse()
                            .map_err(|_| "invalid virtual-link neighbor")?;
                        let area = area_mut(ospf, area_id);
                        area.area_type = AreaType::Transit;
                        area.virtual_link_neighbor = Some(nbr_router_id);
                    }
                    _ => (),
                }
            }
            _ => (),
        }

        Ok(())
    }

    fn parse_access_list(&mut self, args: &[&str]) -> ParseResult {
        let [name, args @ ..] = args else {
            return Err("missing access-list name");
        };
        let (sequence, args) = match args {
            ["remark", ..] => return Ok(()),
            ["seq", sequence, args @ ..] => {
                let sequence = sequence
                    .parse::<u32>()
                    .map_err(|_| "invalid sequence number")?;
                (Some(sequence), args)
            }
            _ => (None, args),
        };
        let [action, destination, ..] = args else {
            return Err("incomplete access-list entry");
        };

        let action = match *action {
            "permit" => AccessAction::Permit,
            "deny" => AccessAction::Deny,
            _ => return Err("invalid access-list action"),
        };
        let destination = match *destination {
            "any" => AccessListDestination::Any,
            prefix => AccessListDestination::Prefix(parse_prefix(prefix)?),
        };

        let acl = self
            .config
            .access_lists
            .entry(name.to_string())
            .or_default();
        let sequence = match sequence {
            Some(sequence) => sequence,
            None => acl
                .items
                .iter()
                .map(|item| item.sequence)
                .max()
                .unwrap_or(0)
                .checked_add(ACL_SEQ_STEP)
                .ok_or("sequence number out of range")?,
        };
        acl.items.push(AccessListItem {
            sequence,
            action,
            destination,
        });
        Ok(())
    }

    fn parse_route_map(&mut self, args: &[&str]) -> ParseResult {
        let [name, action, sequence, ..] = args else {
            return Err("incomplete route-map entry");
        };
        let permit = match *action {
            "permit" => true,
            "deny" => false,
            _ => return Err("invalid route-map action"),
        };
        let sequence = sequence
            .parse::<u32>()
            .map_err(|_| "invalid sequence number")?;

        let route_map =
            self.config.route_maps.entry(name.to_string()).or_default();
        route_map.entries.push(RouteMapEntry {
            sequence,
            permit,
            match_access_list: None,
        });
        let idx = route_map.entries.len() - 1;
        self.context = Context::RouteMap(name.to_string(), idx);
        Ok(())
    }

    fn parse_route_map_line(
        &mut self,
        name: &str,
        idx: usize,
        words: &[&str],
    ) {
        let Some(entry) = self
            .config
            .route_maps
            .get_mut(name)
            .and_then(|route_map| route_map.entries.get_mut(idx))
        else {
            return;
        };

        match words {
            ["match", "ip", "address", "prefix-list", ..] => (),
            ["match", "ip", "address", acl] => {
                entry.match_access_list = Some(acl.to_string());
            }
            _ => (),
        }
    }

    fn finish(self) -> StaticFrrConfiguration {
        let Parser {
            mut config,
            passive_interfaces,
            ..
        } = self;
        for idx in passive_interfaces {
            for prefix in &mut config.interfaces[idx].ip_prefixes {
                prefix.passive = true;
            }
        }
        config
    }
}

// ===== global functions =====

// Parses the static FRR configuration, in the `show running-config` format.
pub fn parse_static_config(text: &str) -> StaticFrrConfiguration {
    let mut parser = Parser::default();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('!') {
            continue;
        }

        let words = line.split_whitespace().collect::<Vec<_>>();
        if let Err(reason) = parser.parse_line(&words) {
            Error::ConfigParse(ConfigParseError {
                line_no: idx + 1,
                line: line.to_owned(),
                reason,
            })
            .log();
        }
    }

    let config = parser.finish();
    Debug::ConfigParsed(&config.hostname, config.interfaces.len()).log();
    config
}

// ===== helper functions =====

fn parse_prefix(prefix: &str) -> Result<Ipv4Network, &'static str> {
    prefix.parse().map_err(|_| "invalid IPv4 prefix")
}

// Area IDs may be written in decimal or dotted-decimal notation. They're
// always normalized to the latter.
fn parse_area_id(area_id: &str) -> Result<String, &'static str> {
    if let Ok(addr) = area_id.parse::<Ipv4Addr>() {
        return Ok(addr.to_string());
    }
    area_id
        .parse::<u32>()
        .map(|area_id| Ipv4Addr::from(area_id).to_string())
        .map_err(|_| "invalid area ID")
}

fn parse_redistribution(
    route_type: &str,
    args: &[&str],
) -> Result<Redistribution, &'static str> {
    let mut redist = Redistribution {
        route_type: route_type.to_owned(),
        ..Default::default()
    };

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match *arg {
            "metric" => {
                let metric = args
                    .next()
                    .and_then(|value| value.parse().ok())
                    .ok_or("invalid redistribution metric")?;
                redist.metric = Some(metric);
            }
            "metric-type" => {
                let metric_type = args
                    .next()
                    .and_then(|value| value.parse().ok())
                    .ok_or("invalid redistribution metric-type")?;
                redist.metric_type = Some(metric_type);
            }
            "route-map" => {
                let route_map =
                    args.next().ok_or("missing redistribution route-map")?;
                redist.route_map = Some(route_map.to_string());
            }
            _ => (),
        }
    }

    Ok(redist)
}

fn area_mut(ospf: &mut OspfConfig, area_id: String) -> &mut OspfArea {
    let idx = match ospf.areas.iter().position(|area| area.name == area_id) {
        Some(idx) => idx,
        None => {
            ospf.areas.push(OspfArea {
                name: area_id,
                ..Default::default()
            });
            ospf.areas.len() - 1
        }
    };
    &mut ospf.areas[idx]
}

// ===== unit tests =====
