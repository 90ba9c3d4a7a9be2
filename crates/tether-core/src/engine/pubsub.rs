//! Publishers and subscribers.

use tracing::warn;

use crate::callback::MatchingCallback;
use crate::engine::{RawPublisher, RawSubscriber, impl_owned_undeclare};
use crate::error::EngineResult;
use crate::handle::{Resource, self_loaned};
use crate::keyexpr::{KeyExpr, KeyExprStr};
use crate::payload::{Bytes, Encoding, SliceMap};

/// Whether a publisher currently has matching subscribers.
///
/// Borrowed to the registered
/// [`MatchingCallback`](crate::callback::MatchingCallback) whenever the set
/// of matching subscribers becomes empty or non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingStatus {
    /// `true` while at least one subscriber matches the publisher's key.
    pub matching: bool,
}

/// A declared publisher.
///
/// Dropping the handle undeclares it best-effort;
/// [`Owned::<Publisher>::undeclare`](crate::handle::Owned::undeclare) is
/// the explicit, error-reporting form. Either way the engine's `undeclare`
/// runs at most once.
pub struct Publisher {
    raw: Box<dyn RawPublisher>,
    key_expr: KeyExpr,
    undeclared: bool,
}

impl Publisher {
    pub(crate) fn new(raw: Box<dyn RawPublisher>, key_expr: KeyExpr) -> Self {
        Self {
            raw,
            key_expr,
            undeclared: false,
        }
    }

    /// Returns the key expression publications go out on.
    pub fn key_expr(&self) -> &KeyExprStr {
        &self.key_expr
    }

    /// Publishes one value with the default encoding.
    pub fn put(&self, payload: impl Into<Bytes>) -> EngineResult<()> {
        self.raw.put(payload.into(), Encoding::default(), None)
    }

    /// Publishes one value with explicit encoding and optional attachment.
    pub fn put_with(
        &self,
        payload: impl Into<Bytes>,
        encoding: Encoding,
        attachment: Option<SliceMap>,
    ) -> EngineResult<()> {
        self.raw.put(payload.into(), encoding, attachment)
    }

    /// Retracts the published value.
    pub fn delete(&self) -> EngineResult<()> {
        self.raw.delete()
    }

    /// Registers a matching-status listener.
    pub fn on_matching_status(&self, on_status: MatchingCallback) -> EngineResult<()> {
        self.raw.on_matching_status(on_status)
    }

    pub(crate) fn undeclare_now(&mut self) -> EngineResult<()> {
        if self.undeclared {
            return Ok(());
        }
        self.undeclared = true;
        self.raw.undeclare()
    }
}

impl Resource for Publisher {
    const KIND: &'static str = "publisher";
}

self_loaned!(Publisher);

impl Drop for Publisher {
    fn drop(&mut self) {
        if !self.undeclared {
            self.undeclared = true;
            if let Err(e) = self.raw.undeclare() {
                warn!(key_expr = %self.key_expr, error = %e, "publisher undeclare failed during drop");
            }
        }
    }
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("key_expr", &self.key_expr)
            .finish()
    }
}

/// A declared subscriber.
///
/// The sample callback registered at declaration time stays armed until the
/// subscriber is undeclared or dropped; the engine releases it (running its
/// capture teardown exactly once) as part of undeclaration.
pub struct Subscriber {
    raw: Box<dyn RawSubscriber>,
    key_expr: KeyExpr,
    undeclared: bool,
}

impl Subscriber {
    pub(crate) fn new(raw: Box<dyn RawSubscriber>, key_expr: KeyExpr) -> Self {
        Self {
            raw,
            key_expr,
            undeclared: false,
        }
    }

    /// Returns the subscribed key expression.
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

impl Resource for Subscriber {
    const KIND: &'static str = "subscriber";
}

self_loaned!(Subscriber);

impl Drop for Subscriber {
    fn drop(&mut self) {
        if !self.undeclared {
            self.undeclared = true;
            if let Err(e) = self.raw.undeclare() {
                warn!(key_expr = %self.key_expr, error = %e, "subscriber undeclare failed during drop");
            }
        }
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("key_expr", &self.key_expr)
            .finish()
    }
}

impl_owned_undeclare!(Publisher, Subscriber);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::Callback;
    use crate::config::Config;
    use crate::engine::mock::MockEngine;
    use crate::engine::Session;
    use crate::keyexpr::KeyExpr;
    use crate::payload::{Sample, SampleKind};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ke(s: &str) -> KeyExpr {
        KeyExpr::new(s).unwrap()
    }

    #[test]
    fn publisher_routes_puts_through_the_engine() {
        let engine = MockEngine::new();
        let session = Session::open(&engine, &Config::new()).unwrap();
        let publisher = session.loan().declare_publisher(&ke("demo/pub")).unwrap();

        publisher.loan().put("one").unwrap();
        publisher.loan().delete().unwrap();

        let puts = engine.state.puts.lock();
        assert_eq!(puts.len(), 2);
        assert_eq!(puts[0].key_expr().as_str(), "demo/pub");
        assert_eq!(puts[1].kind(), SampleKind::Delete);
    }

    #[test]
    fn subscriber_receives_matching_samples() {
        let engine = MockEngine::new();
        let session = Session::open(&engine, &Config::new()).unwrap();

        let received = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&received);
        let _subscriber = session
            .loan()
            .declare_subscriber(
                &ke("demo/**"),
                Callback::new(move |_: &Sample| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        engine.state.publish(&Sample::put(ke("demo/a/b"), "x"));
        engine.state.publish(&Sample::put(ke("other/a"), "x"));
        assert_eq!(received.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn publication_reaches_subscriber_end_to_end() {
        let engine = MockEngine::new();
        let session = Session::open(&engine, &Config::new()).unwrap();

        let payloads = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&payloads);
        let _subscriber = session
            .loan()
            .declare_subscriber(
                &ke("demo/pub"),
                Callback::new(move |sample: &Sample| {
                    sink.lock().push(sample.payload().as_slice().to_vec());
                }),
            )
            .unwrap();

        let publisher = session.loan().declare_publisher(&ke("demo/pub")).unwrap();
        publisher.loan().put("hello").unwrap();

        assert_eq!(*payloads.lock(), [b"hello".to_vec()]);
    }

    #[test]
    fn undeclare_is_explicit_idempotent_and_runs_once() {
        let engine = MockEngine::new();
        let session = Session::open(&engine, &Config::new()).unwrap();
        let mut publisher = session.loan().declare_publisher(&ke("demo/pub")).unwrap();

        publisher.undeclare().unwrap();
        assert!(!publisher.check());
        assert_eq!(engine.state.undeclare_count.load(Ordering::SeqCst), 1);

        publisher.undeclare().unwrap();
        drop(publisher);
        assert_eq!(engine.state.undeclare_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_a_live_subscriber_undeclares_once() {
        let engine = MockEngine::new();
        let session = Session::open(&engine, &Config::new()).unwrap();
        let subscriber = session
            .loan()
            .declare_subscriber(&ke("demo/**"), Callback::new(|_: &Sample| {}))
            .unwrap();
        drop(subscriber);
        assert_eq!(engine.state.undeclare_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn matching_status_is_borrowed_to_the_listener() {
        let engine = MockEngine::new();
        let session = Session::open(&engine, &Config::new()).unwrap();
        let _subscriber = session
            .loan()
            .declare_subscriber(&ke("demo/pub"), Callback::new(|_: &Sample| {}))
            .unwrap();
        let publisher = session.loan().declare_publisher(&ke("demo/pub")).unwrap();

        let observed = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&observed);
        publisher
            .loan()
            .on_matching_status(Callback::new(move |status: &MatchingStatus| {
                if status.matching {
                    sink.fetch_add(1, Ordering::SeqCst);
                }
            }))
            .unwrap();
        assert_eq!(observed.load(Ordering::SeqCst), 1);
    }
}
