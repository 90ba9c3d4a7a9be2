//! # Tether
//!
//! A handle lifecycle and callback dispatch layer for pub/sub middleware.
//!
//! ## Overview
//!
//! Tether manages a family of heterogeneous resource types — sessions,
//! publishers, subscribers, queries, replies, samples, key expressions,
//! byte buffers, callbacks — through uniform lifecycle verbs whose
//! cross-cutting ownership rules are enforced by the type system:
//!
//! - **loan / loan_mut**: borrow a resource's interior, borrow-checked
//! - **finalize**: run teardown exactly once, leaving the handle inert
//! - **null / check**: construct and observe the inert state
//! - **call**: deliver an event through a registered callback handle
//!
//! The network engine itself is an external collaborator implementing the
//! [`Engine`](tether_core::Engine) trait family; Tether defines the
//! ownership contract its objects obey once wrapped in handles.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   open/declare   ┌─────────────────┐
//! │    Engine    │─────────────────▶│ Owned handles   │── loan ──▶ &R::Loaned
//! │  (external)  │                  │ (tether-core)   │
//! └──────────────┘                  └─────────────────┘
//!        │ delivers events                  ▲
//!        ▼                                  │ configures
//! ┌──────────────────────┐          ┌─────────────────┐
//! │ Callback / Consumer  │          │ tether-runtime  │
//! │ / ChannelCallback    │          │ config + logs   │
//! └──────────────────────┘          └─────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tether::prelude::*;
//! use tether::runtime::{config::ConfigLoader, logging};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new().load()?;
//!     logging::init_from_config(&config.logging);
//!
//!     let session = Session::open(&engine, &config.to_core_config()?)?;
//!     let subscriber = session.loan().declare_subscriber(
//!         KeyExprStr::new("demo/**")?,
//!         Callback::new(|sample: &Sample| println!("{sample:?}")),
//!     )?;
//!
//!     // ...
//!     drop(subscriber); // undeclared exactly once
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use tether_core as core;
pub use tether_runtime as runtime;

pub use tether_core::{
    Bytes, BytesReader, Callback, Channel, ChannelCallback, Config, Consumer, Encoding,
    EncodingPrefix, Engine, EngineError, EngineResult, Hello, KeyExpr, KeyExprError, KeyExprStr,
    KeyExprView, LivelinessToken, Loanable, LoanableMut, MatchingStatus, Owned, PeerId,
    PublicationCache, Publisher, Query, Queryable, QueryingSubscriber, Receiver, Reply,
    ReplyError, Resource, Sample, SampleKind, Session, SliceMap, Subscriber, Timestamp, View,
    WhatAmI,
};
pub use tether_runtime::{ConfigLoader, LoggingBuilder, TetherConfig};

/// Prelude for common imports.
pub mod prelude {
    pub use tether_core::prelude::*;
    pub use tether_runtime::{ConfigLoader, TetherConfig};
}
