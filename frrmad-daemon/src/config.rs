//
// Copyright (c) The FRR-MAD Contributors
//
// SPDX-License-Identifier: MIT
//

#![allow(clippy::derivable_impls)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use frrmad_aggregator::fetcher::ConfigSource;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub frr: Frr,
    pub aggregator: Aggregator,
    pub analyzer: Analyzer,
    pub socket: Socket,
    pub exporter: Exporter,
    pub logging: Logging,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Frr {
    pub socket_dir: String,
    pub command_timeout_ms: u64,
    pub config_source: FrrConfigSource,
    pub config_path: String,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum FrrConfigSource {
    #[default]
    Vtysh,
    File,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Aggregator {
    // Seconds.
    pub poll_interval: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Analyzer {
    pub enabled: bool,
    // Seconds.
    pub poll_interval: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Socket {
    pub enabled: bool,
    pub path: String,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Exporter {
    pub enabled: bool,
    pub address: SocketAddr,
    // Seconds.
    pub poll_interval: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Logging {
    pub journald: LoggingJournald,
    pub file: LoggingFile,
    pub stdout: LoggingStdout,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingJournald {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingFile {
    pub enabled: bool,
    pub dir: String,
    pub name: String,
    pub rotation: LoggingFileRotation,
    #[serde(flatten)]
    pub fmt: LoggingFmt,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingStdout {
    pub enabled: bool,
    #[serde(flatten)]
    pub fmt: LoggingFmt,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingFmt {
    pub style: LoggingFmtStyle,
    pub colors: bool,
    pub show_thread_id: bool,
    pub show_source: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFileRotation {
    #[default]
    Never,
    Hourly,
    Daily,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFmtStyle {
    Compact,
    Full,
    Json,
    Pretty,
}

// ===== impl Config =====

impl Config {
    const DFLT_FILEPATH: &'static str = "/etc/frr-mad/frr-madd.toml";

    pub(crate) fn load(config_file: Option<&str>) -> Config {
        let config_file = config_file.unwrap_or(Config::DFLT_FILEPATH);

        match std::fs::read_to_string(config_file) {
            Ok(config_str) => Config::parse(&config_str),
            Err(err) => {
                eprintln!("Failed to load configuration file: {err}");
                eprintln!("Falling back to default configuration...");
                Config::default()
            }
        }
    }

    fn parse(config_str: &str) -> Config {
        match toml::from_str(config_str) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Failed to parse configuration file: {err}");
                std::process::exit(1);
            }
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            frr: Default::default(),
            aggregator: Default::default(),
            analyzer: Default::default(),
            socket: Default::default(),
            exporter: Default::default(),
            logging: Default::default(),
        }
    }
}

// ===== impl Frr =====

impl Frr {
    pub(crate) fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub(crate) fn config_source(&self) -> ConfigSource {
        match self.config_source {
            FrrConfigSource::Vtysh => ConfigSource::Vtysh,
            FrrConfigSource::File => {
                ConfigSource::File(PathBuf::from(&self.config_path))
            }
        }
    }
}

impl Default for Frr {
    fn default() -> Frr {
        Frr {
            socket_dir: "/var/run/frr".to_owned(),
            command_timeout_ms: 2000,
            config_source: Default::default(),
            config_path: "/etc/frr/frr.conf".to_owned(),
        }
    }
}

// ===== impl Aggregator =====

impl Default for Aggregator {
    fn default() -> Aggregator {
        Aggregator { poll_interval: 5 }
    }
}

// ===== impl Analyzer =====

impl Default for Analyzer {
    fn default() -> Analyzer {
        Analyzer {
            enabled: true,
            poll_interval: 5,
        }
    }
}

// ===== impl Socket =====

impl Default for Socket {
    fn default() -> Socket {
        Socket {
            enabled: true,
            path: "/var/run/frr-mad/analyzer.sock".to_owned(),
        }
    }
}

// ===== impl Exporter =====

impl Default for Exporter {
    fn default() -> Exporter {
        Exporter {
            enabled: true,
            address: SocketAddr::from(([0, 0, 0, 0], 9091)),
            poll_interval: 5,
        }
    }
}

// ===== impl LoggingJournald =====

impl Default for LoggingJournald {
    fn default() -> LoggingJournald {
        LoggingJournald { enabled: false }
    }
}

// ===== impl LoggingFile =====

impl Default for LoggingFile {
    fn default() -> LoggingFile {
        LoggingFile {
            enabled: true,
            dir: "/var/log/frr-mad".to_owned(),
            name: "frr-madd.log".to_owned(),
            rotation: Default::default(),
            fmt: Default::default(),
        }
    }
}

// ===== impl LoggingStdout =====

impl Default for LoggingStdout {
    fn default() -> LoggingStdout {
        LoggingStdout {
            enabled: false,
            fmt: Default::default(),
        }
    }
}

// ===== impl LoggingFmt =====

impl Default for LoggingFmt {
    fn default() -> LoggingFmt {
        LoggingFmt {
            style: LoggingFmtStyle::Full,
            colors: false,
            show_thread_id: false,
            show_source: false,
        }
    }
}

// ===== unit tests =====
