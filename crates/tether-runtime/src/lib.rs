//! # Tether Runtime
//!
//! The ambient runtime layer for Tether deployments: typed configuration
//! with layered loading, and logging setup.
//!
//! The core crate's [`Config`](tether_core::Config) is a free-form JSON
//! document; this crate provides the typed schema
//! ([`TetherConfig`](config::TetherConfig)), the figment-based loader that
//! fills it from files and environment variables, validation, and the
//! bridge back into the engine-facing document.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tether_runtime::{config::ConfigLoader, logging};
//!
//! let config = ConfigLoader::new().load()?;
//! logging::init_from_config(&config.logging);
//!
//! let core = config.to_core_config()?;
//! let session = tether_core::Session::open(&engine, &core)?;
//! ```
//!
//! ## Features
//!
//! - `toml-config`: load `tether.toml` files
//! - `yaml-config`: load `tether.yaml` files
//! - `json-log`: JSON log output

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ConfigLoader, Profile, TetherConfig};
pub use error::{ConfigError, ConfigResult};
pub use logging::LoggingBuilder;
