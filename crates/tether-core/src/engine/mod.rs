//! The seam to the underlying messaging engine.
//!
//! Tether does not implement a network protocol: session establishment,
//! routing, wire encoding and pub/sub matching belong to an engine crate
//! that implements the trait family defined here. This layer defines the
//! ownership contract the engine's objects must obey once wrapped in
//! handles:
//!
//! - constructors hand back exclusively-owned objects
//!   ([`Engine::open`], the `declare_*` operations);
//! - teardown is best-effort — implicit teardown on drop absorbs and logs
//!   failures, while the explicit `close`/`undeclare` verbs report them;
//! - events are delivered by invoking the registered callback handles from
//!   the engine's delivery threads, honoring each category's payload rule
//!   (see [`crate::callback`]) and, for channel callbacks, stopping once a
//!   call returns `false`.

mod ext;
mod pubsub;
mod queryable;
mod session;

pub use ext::{LivelinessToken, PublicationCache, QueryingSubscriber};
pub use pubsub::{MatchingStatus, Publisher, Subscriber};
pub use queryable::Queryable;
pub use session::Session;

use crate::callback::{ChannelCallback, HelloConsumer, MatchingCallback, PeerIdCallback, QueryCallback, SampleCallback};
use crate::config::Config;
use crate::error::EngineResult;
use crate::keyexpr::KeyExprStr;
use crate::payload::{Bytes, Encoding, PeerId, Reply, SliceMap};

/// An engine implementation: the entry point that opens sessions and
/// scouts for peers.
pub trait Engine: Send + Sync {
    /// A short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Opens a session configured by `config`.
    fn open(&self, config: &Config) -> EngineResult<Box<dyn RawSession>>;

    /// Scouts for reachable peers, handing each [`Hello`](crate::payload::Hello)
    /// over to `on_hello`. Returns once scouting (bounded by the
    /// `scouting/*` configuration paths) completes.
    fn scout(&self, config: &Config, on_hello: HelloConsumer) -> EngineResult<()>;
}

/// An open engine session.
pub trait RawSession: Send + Sync {
    /// Returns this session's peer id.
    fn peer_id(&self) -> PeerId;

    /// Publishes one value on `key_expr`.
    fn put(&self, key_expr: &KeyExprStr, payload: Bytes, encoding: Encoding) -> EngineResult<()>;

    /// Retracts the value previously published on `key_expr`.
    fn delete(&self, key_expr: &KeyExprStr) -> EngineResult<()>;

    /// Issues a query and streams replies through `on_reply` until the
    /// stream ends or a call returns `false`.
    fn get(
        &self,
        key_expr: &KeyExprStr,
        parameters: &str,
        on_reply: ChannelCallback<Reply>,
    ) -> EngineResult<()>;

    /// Declares a publisher on `key_expr`.
    fn declare_publisher(&self, key_expr: &KeyExprStr) -> EngineResult<Box<dyn RawPublisher>>;

    /// Declares a subscriber; matching samples are borrowed to `on_sample`.
    fn declare_subscriber(
        &self,
        key_expr: &KeyExprStr,
        on_sample: SampleCallback,
    ) -> EngineResult<Box<dyn RawSubscriber>>;

    /// Declares a queryable; matching queries are borrowed to `on_query`.
    /// `complete` advertises that this queryable holds the complete data
    /// set for its key space.
    fn declare_queryable(
        &self,
        key_expr: &KeyExprStr,
        complete: bool,
        on_query: QueryCallback,
    ) -> EngineResult<Box<dyn RawQueryable>>;

    /// Declares a liveliness token on `key_expr`.
    fn declare_liveliness_token(
        &self,
        key_expr: &KeyExprStr,
    ) -> EngineResult<Box<dyn RawLivelinessToken>>;

    /// Declares a publication cache retaining `history` samples per key.
    fn declare_publication_cache(
        &self,
        key_expr: &KeyExprStr,
        history: usize,
    ) -> EngineResult<Box<dyn RawPublicationCache>>;

    /// Declares a subscriber that first queries for historical samples.
    fn declare_querying_subscriber(
        &self,
        key_expr: &KeyExprStr,
        on_sample: SampleCallback,
    ) -> EngineResult<Box<dyn RawQueryingSubscriber>>;

    /// Enumerates the ids of reachable peers.
    fn info_peers(&self, on_peer: PeerIdCallback) -> EngineResult<()>;

    /// Enumerates the ids of reachable routers.
    fn info_routers(&self, on_peer: PeerIdCallback) -> EngineResult<()>;

    /// Closes the session. Called at most once.
    fn close(&mut self) -> EngineResult<()>;
}

/// An engine-side publisher.
pub trait RawPublisher: Send + Sync {
    /// Publishes one value.
    fn put(
        &self,
        payload: Bytes,
        encoding: Encoding,
        attachment: Option<SliceMap>,
    ) -> EngineResult<()>;

    /// Retracts the published value.
    fn delete(&self) -> EngineResult<()>;

    /// Registers a matching-status listener; the status is borrowed to
    /// `on_status` whenever the set of matching subscribers becomes empty
    /// or non-empty.
    fn on_matching_status(&self, on_status: MatchingCallback) -> EngineResult<()>;

    /// Undeclares the publisher. Called at most once.
    fn undeclare(&mut self) -> EngineResult<()>;
}

/// An engine-side subscriber.
pub trait RawSubscriber: Send + Sync {
    /// Undeclares the subscriber. Called at most once.
    fn undeclare(&mut self) -> EngineResult<()>;
}

/// An engine-side queryable.
pub trait RawQueryable: Send + Sync {
    /// Undeclares the queryable. Called at most once.
    fn undeclare(&mut self) -> EngineResult<()>;
}

/// The reply port the engine attaches to each delivered
/// [`Query`](crate::payload::Query).
pub trait RawReplier: Send + Sync {
    /// Routes one reply back to the querier.
    fn reply(&self, reply: Reply) -> EngineResult<()>;
}

/// An engine-side liveliness token.
pub trait RawLivelinessToken: Send + Sync {
    /// Undeclares the token. Called at most once.
    fn undeclare(&mut self) -> EngineResult<()>;
}

/// An engine-side publication cache.
pub trait RawPublicationCache: Send + Sync {
    /// Undeclares the cache. Called at most once.
    fn undeclare(&mut self) -> EngineResult<()>;
}

/// An engine-side querying subscriber.
pub trait RawQueryingSubscriber: Send + Sync {
    /// Undeclares the subscriber. Called at most once.
    fn undeclare(&mut self) -> EngineResult<()>;
}

/// Implements the explicit, error-reporting `undeclare` verb on
/// `Owned<$ty>`: takes the entity out (leaving the handle inert) and runs
/// its teardown once. Undeclaring an inert handle is a no-op.
macro_rules! impl_owned_undeclare {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::handle::Owned<$ty> {
            /// Undeclares the entity and leaves the handle inert,
            /// reporting the engine error if any. A no-op on an inert
            /// handle.
            pub fn undeclare(&mut self) -> $crate::error::EngineResult<()> {
                match self.take() {
                    Some(mut entity) => entity.undeclare_now(),
                    None => Ok(()),
                }
            }
        }
    )*};
}

pub(crate) use impl_owned_undeclare;
