//! Callback handles for asynchronous event delivery.
//!
//! The engine delivers events by invoking callback handles the caller
//! registered. A callback handle owns its captured state the same way an
//! [`Owned`](crate::handle::Owned) handle owns a resource: it is either
//! *unarmed* (inert) or *armed*, and the captured state is torn down exactly
//! once — when the handle is finalized, dropped, or consumed by a one-shot
//! `finish` call.
//!
//! Three shapes exist, differing in how the payload is passed:
//!
//! - [`Callback<T>`] — the payload is **borrowed** for the duration of the
//!   call; delivery is fire-and-forget and unbounded.
//! - [`Consumer<T>`] — the payload is **handed over**; the callback owns it
//!   and is responsible for it. Delivery is fire-and-forget and unbounded.
//! - [`ChannelCallback<T>`] — the payload is handed over and the callback
//!   returns a continuation `bool`: `false` tells the producer to stop
//!   delivering on this stream. The dispatcher only reports the bool; acting
//!   on it is the producer loop's job.
//!
//! Callbacks may be invoked from an engine delivery thread distinct from the
//! registering thread, so captures must be `Send + Sync`. The engine is
//! assumed to serialize invocations per handle: at most one call is in
//! flight on a given callback at a time unless the engine documents
//! otherwise.
//!
//! # Event categories
//!
//! The payload-ownership rule is fixed per event category:
//!
//! | Alias | Shape | Payload rule |
//! |---|---|---|
//! | [`SampleCallback`] | `Callback<Sample>` | sample borrowed per call (subscriber delivery) |
//! | [`QueryCallback`] | `Callback<Query>` | query borrowed per call (queryable delivery) |
//! | [`ReplyCallback`] | `Callback<Reply>` | reply borrowed per call |
//! | [`PeerIdCallback`] | `Callback<PeerId>` | id borrowed per call (peer enumeration) |
//! | [`MatchingCallback`] | `Callback<MatchingStatus>` | status borrowed per call |
//! | [`HelloConsumer`] | `Consumer<Hello>` | hello handed over (discovery results) |
//! | [`QueryConsumer`] | `Consumer<Query>` | query handed over (engines that transfer ownership) |
//! | [`ReplyChannel`] | `Channel<Reply>` | replies handed over; `false` stops the stream |
//! | [`QueryChannel`] | `Channel<Query>` | queries handed over; `false` stops the stream |

mod channel;
mod notify;

pub use channel::{Channel, ChannelCallback, Receiver, fifo};
pub use notify::{Callback, Consumer};

use crate::engine::MatchingStatus;
use crate::payload::{Hello, PeerId, Query, Reply, Sample};

/// Subscriber delivery: one borrowed [`Sample`] per publication.
pub type SampleCallback = Callback<Sample>;

/// Queryable delivery: one borrowed [`Query`] per incoming query.
pub type QueryCallback = Callback<Query>;

/// Reply delivery for fire-and-forget gets.
pub type ReplyCallback = Callback<Reply>;

/// Peer-id notification, used by the info operations.
pub type PeerIdCallback = Callback<PeerId>;

/// Matching-status change notification for publishers.
pub type MatchingCallback = Callback<MatchingStatus>;

/// Discovery delivery: each [`Hello`] is handed over to the callback.
pub type HelloConsumer = Consumer<Hello>;

/// Query delivery with ownership transfer.
pub type QueryConsumer = Consumer<Query>;

/// Streaming reply channel: the send end is handed to
/// [`Session::get`](crate::engine::Session::get).
pub type ReplyChannel = Channel<Reply>;

/// Streaming query channel for channeled queryables.
pub type QueryChannel = Channel<Query>;
