//! Queryables: the serving side of the query/reply exchange.

use tracing::warn;

use crate::engine::{RawQueryable, impl_owned_undeclare};
use crate::error::EngineResult;
use crate::handle::{Resource, self_loaned};
use crate::keyexpr::{KeyExpr, KeyExprStr};

/// A declared queryable.
///
/// Incoming queries are borrowed to the callback registered at declaration
/// time; each carries a reply port (see
/// [`Query::reply`](crate::payload::Query::reply)). Dropping the handle
/// undeclares best-effort;
/// [`Owned::<Queryable>::undeclare`](crate::handle::Owned::undeclare) is
/// the explicit form.
pub struct Queryable {
    raw: Box<dyn RawQueryable>,
    key_expr: KeyExpr,
    undeclared: bool,
}

impl Queryable {
    pub(crate) fn new(raw: Box<dyn RawQueryable>, key_expr: KeyExpr) -> Self {
        Self {
            raw,
            key_expr,
            undeclared: false,
        }
    }

    /// Returns the served key expression.
    pub fn key_expr(&self) -> &KeyExprStr {
        &self.key_expr
    }

    pub(crate) fn undeclare_now(&mut self) -> EngineResult<()> {
        if self.undeclared {
            return Ok(());
        }
        self.undeclared = true;
        self.raw.undeclare()
    }
}

impl Resource for Queryable {
    const KIND: &'static str = "queryable";
}

self_loaned!(Queryable);

impl Drop for Queryable {
    fn drop(&mut self) {
        if !self.undeclared {
            self.undeclared = true;
            if let Err(e) = self.raw.undeclare() {
                warn!(key_expr = %self.key_expr, error = %e, "queryable undeclare failed during drop");
            }
        }
    }
}

impl std::fmt::Debug for Queryable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queryable")
            .field("key_expr", &self.key_expr)
            .finish()
    }
}

impl_owned_undeclare!(Queryable);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::Callback;
    use crate::config::Config;
    use crate::engine::RawReplier;
    use crate::engine::Session;
    use crate::engine::mock::MockEngine;
    use crate::error::TryRecvError;
    use crate::payload::{Query, Reply, Sample};
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    fn ke(s: &str) -> KeyExpr {
        KeyExpr::new(s).unwrap()
    }

    /// Reply port collecting replies for inspection.
    #[derive(Default)]
    struct CollectingReplier {
        replies: parking_lot::Mutex<Vec<Reply>>,
    }

    impl RawReplier for CollectingReplier {
        fn reply(&self, reply: Reply) -> EngineResult<()> {
            self.replies.lock().push(reply);
            Ok(())
        }
    }

    #[test]
    fn queryable_serves_matching_queries() {
        let engine = MockEngine::new();
        let session = Session::open(&engine, &Config::new()).unwrap();

        let _queryable = session
            .loan()
            .declare_queryable(
                &ke("demo/service/**"),
                true,
                Callback::new(|query: &Query| {
                    let sample = Sample::put(query.key_expr().clone(), "answer");
                    query.reply(sample).unwrap();
                }),
            )
            .unwrap();

        let port = Arc::new(CollectingReplier::default());
        let replier: Arc<dyn RawReplier> = port.clone();
        let query = Query::new(ke("demo/service/item"), "kind=full").with_replier(replier);
        engine.state.query(&query);

        let replies = port.replies.lock();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].sample().unwrap().payload().as_slice(), b"answer");
    }

    #[test]
    fn non_matching_queries_are_not_served() {
        let engine = MockEngine::new();
        let session = Session::open(&engine, &Config::new()).unwrap();
        let _queryable = session
            .loan()
            .declare_queryable(
                &ke("demo/service/**"),
                false,
                Callback::new(|query: &Query| {
                    query
                        .reply(Sample::put(query.key_expr().clone(), "answer"))
                        .unwrap();
                }),
            )
            .unwrap();

        let port = Arc::new(CollectingReplier::default());
        let replier: Arc<dyn RawReplier> = port.clone();
        let query = Query::new(ke("other/place"), "").with_replier(replier);
        engine.state.query(&query);
        assert!(port.replies.lock().is_empty());
    }

    #[test]
    fn fifo_queryable_clones_queries_into_the_channel() {
        let engine = MockEngine::new();
        let session = Session::open(&engine, &Config::new()).unwrap();
        let (queryable, receiver) = session
            .loan()
            .declare_queryable_fifo(&ke("demo/service"), false, 0)
            .unwrap();
        assert!(queryable.check());

        engine.state.query(&Query::new(ke("demo/service"), "a=1"));
        engine.state.query(&Query::new(ke("demo/service"), "a=2"));

        assert_eq!(receiver.try_recv().unwrap().parameters(), "a=1");
        assert_eq!(receiver.try_recv().unwrap().parameters(), "a=2");
        assert_eq!(
            receiver.try_recv().unwrap_err(),
            TryRecvError::Empty
        );
    }

    #[test]
    fn undeclare_runs_exactly_once() {
        let engine = MockEngine::new();
        let session = Session::open(&engine, &Config::new()).unwrap();
        let mut queryable = session
            .loan()
            .declare_queryable(&ke("demo/service"), false, Callback::new(|_: &Query| {}))
            .unwrap();

        queryable.undeclare().unwrap();
        queryable.undeclare().unwrap();
        drop(queryable);
        assert_eq!(engine.state.undeclare_count.load(Ordering::SeqCst), 1);
    }
}
