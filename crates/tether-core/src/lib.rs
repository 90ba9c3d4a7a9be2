//! # Tether Core
//!
//! The handle lifecycle and callback dispatch core of the Tether pub/sub
//! middleware.
//!
//! Tether lets callers manage a large family of resource types — sessions,
//! publishers, subscribers, queries, replies, samples, key expressions,
//! byte buffers, callbacks — through a small set of uniform verbs, with the
//! cross-cutting ownership discipline enforced by the type system instead
//! of by caller discipline.
//!
//! ## Architecture Layers
//!
//! ### Handle Layer
//!
//! The lifecycle primitives and capability traits:
//! - **Owned handles**: live-or-inert resource owners ([`Owned`])
//! - **Views**: borrowed descriptors over caller memory ([`View`])
//! - **Classification**: one [`Resource`]/[`Loanable`]/[`LoanableMut`] impl
//!   per concrete type; a missing impl is a compile error, not a runtime
//!   fallback
//!
//! ### Callback Layer
//!
//! Event delivery contracts ([`callback`]):
//! - **Notify callbacks**: borrowed-payload ([`Callback`]) and
//!   handed-over-payload ([`Consumer`]) fire-and-forget delivery
//! - **Channel callbacks**: `bool`-returning streaming delivery with
//!   cooperative cancellation ([`ChannelCallback`], [`Channel`])
//!
//! ### Engine Layer
//!
//! The seam to the excluded networking engine ([`engine`]): the [`Engine`]
//! and `Raw*` traits an engine implements, and the handle types wrapped
//! around its objects ([`Session`], [`Publisher`], [`Subscriber`],
//! [`Queryable`] and the extended entities).
//!
//! ## Ownership Flow
//!
//! ```text
//! ┌──────────┐  open/declare  ┌────────────┐  loan   ┌───────────────┐
//! │  Engine  │───────────────▶│ Owned<R>   │────────▶│ &R::Loaned    │
//! │ (extern) │                │ live|inert │         │ borrow-checked│
//! └──────────┘                └────────────┘         └───────────────┘
//!      │        call                 │ finalize / drop
//!      ▼                            ▼ (teardown exactly once)
//! ┌───────────────────┐       ┌────────────┐
//! │ Callback/Consumer │       │   inert    │
//! │ /ChannelCallback  │       └────────────┘
//! └───────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use tether_core::prelude::*;
//!
//! let session = Session::open(&engine, &config)?;
//! let subscriber = session.loan().declare_subscriber(
//!     KeyExprStr::new("demo/**")?,
//!     Callback::new(|sample: &Sample| {
//!         println!("{} = {:?}", sample.key_expr(), sample.payload());
//!     }),
//! )?;
//! assert!(subscriber.check());
//! ```

pub mod callback;
pub mod config;
pub mod engine;
pub mod error;
pub mod handle;
pub mod keyexpr;
pub mod payload;
pub mod sync;

// Re-export the handle layer
pub use handle::{Loanable, LoanableMut, Owned, Resource, View};

// Re-export the callback layer
pub use callback::{
    Callback, Channel, ChannelCallback, Consumer, HelloConsumer, MatchingCallback, PeerIdCallback,
    QueryCallback, QueryChannel, QueryConsumer, Receiver, ReplyCallback, ReplyChannel,
    SampleCallback,
};

// Re-export the engine layer
pub use engine::{
    Engine, LivelinessToken, MatchingStatus, PublicationCache, Publisher, Queryable,
    QueryingSubscriber, RawLivelinessToken, RawPublicationCache, RawPublisher, RawQueryable,
    RawQueryingSubscriber, RawReplier, RawSession, RawSubscriber, Session, Subscriber,
};

// Re-export data types and errors
pub use config::Config;
pub use error::{
    ConfigError, ConfigResult, EngineError, EngineResult, KeyExprError, KeyExprResult,
    TryRecvError,
};
pub use keyexpr::{KeyExpr, KeyExprStr, KeyExprView, key_expr_view};
pub use payload::{
    Bytes, BytesReader, Encoding, EncodingPrefix, Hello, PeerId, Query, Reply, ReplyError, Sample,
    SampleKind, SliceMap, Timestamp, WhatAmI,
};

/// Prelude for common imports.
pub mod prelude {
    pub use super::callback::{Callback, Channel, ChannelCallback, Consumer};
    pub use super::config::Config;
    pub use super::engine::{Engine, Publisher, Queryable, Session, Subscriber};
    pub use super::error::{EngineError, EngineResult};
    pub use super::handle::{Loanable, LoanableMut, Owned, Resource, View};
    pub use super::keyexpr::{KeyExpr, KeyExprStr};
    pub use super::payload::{Bytes, Encoding, Hello, Query, Reply, Sample, SliceMap};
}
