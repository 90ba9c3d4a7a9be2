//! Typed configuration schema.
//!
//! This is the structured view of a Tether deployment's configuration.
//! [`TetherConfig::to_core_config`] flattens it into the JSON
//! [`Config`](tether_core::Config) document the engine reads.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ConfigResult;

/// The session's role in the network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Mesh peer: routes for itself and its neighborhood.
    #[default]
    Peer,
    /// Leaf client: relies on a router.
    Client,
    /// Routing node.
    Router,
}

impl Mode {
    /// Returns the canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Peer => "peer",
            Self::Client => "client",
            Self::Router => "router",
        }
    }
}

/// Scouting (peer discovery) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutingConfig {
    /// Whether multicast scouting is enabled.
    pub multicast_enabled: bool,
    /// The multicast group scouting messages go out on.
    pub multicast_address: String,
    /// How long a scout round listens for hellos.
    pub timeout_ms: u64,
}

impl Default for ScoutingConfig {
    fn default() -> Self {
        Self {
            multicast_enabled: true,
            multicast_address: "224.0.0.224:7446".to_string(),
            timeout_ms: 1000,
        }
    }
}

/// Log verbosity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose.
    Trace,
    /// Debugging detail.
    Debug,
    /// Normal operation.
    #[default]
    Info,
    /// Something looks wrong.
    Warn,
    /// Something failed.
    Error,
}

impl LogLevel {
    /// Returns the lowercase directive name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts into a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line, abbreviated.
    #[default]
    Compact,
    /// Single-line, full fields.
    Full,
    /// Multi-line, human-oriented.
    Pretty,
    /// JSON lines (requires the `json-log` feature).
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
    /// A file (see `file_path`).
    File,
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base verbosity.
    pub level: LogLevel,
    /// Line format.
    pub format: LogFormat,
    /// Destination.
    pub output: LogOutput,
    /// Path for file output.
    pub file_path: Option<PathBuf>,
    /// Per-module level overrides, e.g. `tether_core = "debug"`.
    pub filters: HashMap<String, LogLevel>,
}

/// The root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    /// The session's role.
    pub mode: Mode,
    /// Endpoints to connect to, e.g. `tcp/192.168.1.1:7447`.
    pub connect: Vec<String>,
    /// Endpoints to listen on.
    pub listen: Vec<String>,
    /// Peer discovery settings.
    pub scouting: ScoutingConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl TetherConfig {
    /// Flattens into the JSON document the engine reads.
    ///
    /// Logging settings stay out: they configure this process, not the
    /// engine.
    pub fn to_core_config(&self) -> ConfigResult<tether_core::Config> {
        let mut config = tether_core::Config::new();
        config.insert("mode", json!(self.mode.as_str()))?;
        config.insert("connect/endpoints", json!(self.connect))?;
        config.insert("listen/endpoints", json!(self.listen))?;
        config.insert(
            "scouting/multicast/enabled",
            json!(self.scouting.multicast_enabled),
        )?;
        config.insert(
            "scouting/multicast/address",
            json!(self.scouting.multicast_address),
        )?;
        config.insert("scouting/timeout_ms", json!(self.scouting.timeout_ms))?;
        Ok(config)
    }
}
