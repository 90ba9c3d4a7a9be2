//! Sessions: the root handle every other engine entity is declared from.

use tracing::{debug, warn};

use crate::callback::{Callback, Channel, ChannelCallback, PeerIdCallback, Receiver, ReplyCallback, SampleCallback};
use crate::engine::{
    Engine, LivelinessToken, PublicationCache, Publisher, Queryable, QueryingSubscriber,
    RawSession, Subscriber,
};
use crate::config::Config;
use crate::error::EngineResult;
use crate::handle::{Owned, Resource, self_loaned};
use crate::keyexpr::KeyExprStr;
use crate::payload::{Bytes, Encoding, PeerId, Query, Reply};

/// An open session on the messaging engine.
///
/// Created by [`Session::open`], which returns it already wrapped in an
/// [`Owned`] handle. Dropping the handle closes the session best-effort
/// (failures are logged and absorbed); [`Owned::<Session>::close`] is the
/// explicit, error-reporting form. Either way the engine's `close` runs at
/// most once.
pub struct Session {
    raw: Box<dyn RawSession>,
    closed: bool,
}

impl Session {
    /// Opens a session on `engine`, configured by `config`.
    pub fn open(engine: &dyn Engine, config: &Config) -> EngineResult<Owned<Session>> {
        let raw = engine.open(config)?;
        debug!(engine = engine.name(), "session opened");
        Ok(Owned::new(Session { raw, closed: false }))
    }

    /// Returns this session's peer id.
    pub fn peer_id(&self) -> PeerId {
        self.raw.peer_id()
    }

    /// Publishes one value on `key_expr` without declaring a publisher.
    pub fn put(
        &self,
        key_expr: &KeyExprStr,
        payload: impl Into<Bytes>,
        encoding: Encoding,
    ) -> EngineResult<()> {
        self.raw.put(key_expr, payload.into(), encoding)
    }

    /// Retracts the value previously published on `key_expr`.
    pub fn delete(&self, key_expr: &KeyExprStr) -> EngineResult<()> {
        self.raw.delete(key_expr)
    }

    /// Issues a query, streaming replies through `on_reply`.
    ///
    /// The engine stops delivering as soon as a call returns `false`.
    pub fn get(
        &self,
        key_expr: &KeyExprStr,
        parameters: &str,
        on_reply: ChannelCallback<Reply>,
    ) -> EngineResult<()> {
        self.raw.get(key_expr, parameters, on_reply)
    }

    /// Issues a query, borrowing each reply to `on_reply` with no way to
    /// stop the stream early.
    pub fn get_each(
        &self,
        key_expr: &KeyExprStr,
        parameters: &str,
        on_reply: ReplyCallback,
    ) -> EngineResult<()> {
        let forward = ChannelCallback::new(move |reply: Reply| {
            on_reply.call(&reply);
            true
        });
        self.raw.get(key_expr, parameters, forward)
    }

    /// Issues a query and returns the receiving end of a FIFO channel of
    /// replies. With `bound == 0` the channel is unbounded; otherwise the
    /// engine is back-pressured while the channel is full.
    pub fn get_fifo(
        &self,
        key_expr: &KeyExprStr,
        parameters: &str,
        bound: usize,
    ) -> EngineResult<Receiver<Reply>> {
        let Channel { send, recv } = Channel::fifo(bound);
        self.raw.get(key_expr, parameters, send)?;
        Ok(recv)
    }

    /// Declares a publisher on `key_expr`.
    pub fn declare_publisher(&self, key_expr: &KeyExprStr) -> EngineResult<Owned<Publisher>> {
        let raw = self.raw.declare_publisher(key_expr)?;
        Ok(Owned::new(Publisher::new(raw, key_expr.to_key_expr())))
    }

    /// Declares a subscriber; matching samples are borrowed to `on_sample`
    /// from the engine's delivery thread.
    pub fn declare_subscriber(
        &self,
        key_expr: &KeyExprStr,
        on_sample: SampleCallback,
    ) -> EngineResult<Owned<Subscriber>> {
        let raw = self.raw.declare_subscriber(key_expr, on_sample)?;
        Ok(Owned::new(Subscriber::new(raw, key_expr.to_key_expr())))
    }

    /// Declares a queryable; matching queries are borrowed to `on_query`.
    pub fn declare_queryable(
        &self,
        key_expr: &KeyExprStr,
        complete: bool,
        on_query: Callback<Query>,
    ) -> EngineResult<Owned<Queryable>> {
        let raw = self.raw.declare_queryable(key_expr, complete, on_query)?;
        Ok(Owned::new(Queryable::new(raw, key_expr.to_key_expr())))
    }

    /// Declares a queryable that clones each incoming query into a FIFO
    /// channel, returning the queryable and the channel's receiving end.
    pub fn declare_queryable_fifo(
        &self,
        key_expr: &KeyExprStr,
        complete: bool,
        bound: usize,
    ) -> EngineResult<(Owned<Queryable>, Receiver<Query>)> {
        let Channel { send, recv } = Channel::fifo(bound);
        let on_query = Callback::new(move |query: &Query| {
            send.call(query.clone());
        });
        let queryable = self.declare_queryable(key_expr, complete, on_query)?;
        Ok((queryable, recv))
    }

    /// Declares a liveliness token on `key_expr`.
    pub fn declare_liveliness_token(
        &self,
        key_expr: &KeyExprStr,
    ) -> EngineResult<Owned<LivelinessToken>> {
        let raw = self.raw.declare_liveliness_token(key_expr)?;
        Ok(Owned::new(LivelinessToken::new(raw)))
    }

    /// Declares a publication cache retaining `history` samples per key.
    pub fn declare_publication_cache(
        &self,
        key_expr: &KeyExprStr,
        history: usize,
    ) -> EngineResult<Owned<PublicationCache>> {
        let raw = self.raw.declare_publication_cache(key_expr, history)?;
        Ok(Owned::new(PublicationCache::new(raw)))
    }

    /// Declares a subscriber that first queries for historical samples.
    pub fn declare_querying_subscriber(
        &self,
        key_expr: &KeyExprStr,
        on_sample: SampleCallback,
    ) -> EngineResult<Owned<QueryingSubscriber>> {
        let raw = self.raw.declare_querying_subscriber(key_expr, on_sample)?;
        Ok(Owned::new(QueryingSubscriber::new(raw)))
    }

    /// Enumerates the ids of reachable peers.
    pub fn info_peers(&self, on_peer: PeerIdCallback) -> EngineResult<()> {
        self.raw.info_peers(on_peer)
    }

    /// Enumerates the ids of reachable routers.
    pub fn info_routers(&self, on_peer: PeerIdCallback) -> EngineResult<()> {
        self.raw.info_routers(on_peer)
    }

    pub(crate) fn close_now(&mut self) -> EngineResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.raw.close()
    }
}

impl Resource for Session {
    const KIND: &'static str = "session";
}

self_loaned!(Session);

impl Drop for Session {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(e) = self.raw.close() {
                warn!(error = %e, "session close failed during drop");
            }
        }
    }
}

impl Owned<Session> {
    /// Closes the session and leaves the handle inert, reporting the
    /// engine error if any. Closing an inert handle is a no-op.
    pub fn close(&mut self) -> EngineResult<()> {
        match self.take() {
            Some(mut session) => session.close_now(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("peer_id", &self.peer_id())
            .finish()
    }
}
