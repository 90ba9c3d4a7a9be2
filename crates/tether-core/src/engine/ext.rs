//! Extended entities: liveliness tokens, publication caches and querying
//! subscribers.
//!
//! These follow the same teardown contract as the primary entities.
//! [`LivelinessToken`] and [`PublicationCache`] deliberately have no
//! [`Loanable`](crate::handle::Loanable) impl: there is nothing to borrow
//! from them, so the loan verb does not resolve — their capability entry is
//! null/check/undeclare only.

use tracing::warn;

use crate::engine::{
    RawLivelinessToken, RawPublicationCache, RawQueryingSubscriber, impl_owned_undeclare,
};
use crate::error::EngineResult;
use crate::handle::{Resource, self_loaned};

/// A token asserting this process's liveliness on a key expression.
///
/// Peers monitoring the key observe the token's appearance and, once it is
/// undeclared or dropped, its disappearance.
pub struct LivelinessToken {
    raw: Box<dyn RawLivelinessToken>,
    undeclared: bool,
}

impl LivelinessToken {
    pub(crate) fn new(raw: Box<dyn RawLivelinessToken>) -> Self {
        Self {
            raw,
            undeclared: false,
        }
    }

    pub(crate) fn undeclare_now(&mut self) -> EngineResult<()> {
        if self.undeclared {
            return Ok(());
        }
        self.undeclared = true;
        self.raw.undeclare()
    }
}

impl Resource for LivelinessToken {
    const KIND: &'static str = "liveliness_token";
}

impl Drop for LivelinessToken {
    fn drop(&mut self) {
        if !self.undeclared {
            self.undeclared = true;
            if let Err(e) = self.raw.undeclare() {
                warn!(error = %e, "liveliness token undeclare failed during drop");
            }
        }
    }
}

impl std::fmt::Debug for LivelinessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LivelinessToken")
    }
}

/// A cache replaying past publications to late-joining queriers.
pub struct PublicationCache {
    raw: Box<dyn RawPublicationCache>,
    undeclared: bool,
}

impl PublicationCache {
    pub(crate) fn new(raw: Box<dyn RawPublicationCache>) -> Self {
        Self {
            raw,
            undeclared: false,
        }
    }

    pub(crate) fn undeclare_now(&mut self) -> EngineResult<()> {
        if self.undeclared {
            return Ok(());
        }
        self.undeclared = true;
        self.raw.undeclare()
    }
}

impl Resource for PublicationCache {
    const KIND: &'static str = "publication_cache";
}

impl Drop for PublicationCache {
    fn drop(&mut self) {
        if !self.undeclared {
            self.undeclared = true;
            if let Err(e) = self.raw.undeclare() {
                warn!(error = %e, "publication cache undeclare failed during drop");
            }
        }
    }
}

impl std::fmt::Debug for PublicationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PublicationCache")
    }
}

/// A subscriber that first queries for historical samples, then keeps
/// receiving live publications.
pub struct QueryingSubscriber {
    raw: Box<dyn RawQueryingSubscriber>,
    undeclared: bool,
}

impl QueryingSubscriber {
    pub(crate) fn new(raw: Box<dyn RawQueryingSubscriber>) -> Self {
        Self {
            raw,
            undeclared: false,
        }
    }

    pub(crate) fn undeclare_now(&mut self) -> EngineResult<()> {
        if self.undeclared {
            return Ok(());
        }
        self.undeclared = true;
        self.raw.undeclare()
    }
}

impl Resource for QueryingSubscriber {
    const KIND: &'static str = "querying_subscriber";
}

self_loaned!(QueryingSubscriber);

impl Drop for QueryingSubscriber {
    fn drop(&mut self) {
        if !self.undeclared {
            self.undeclared = true;
            if let Err(e) = self.raw.undeclare() {
                warn!(error = %e, "querying subscriber undeclare failed during drop");
            }
        }
    }
}

impl std::fmt::Debug for QueryingSubscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("QueryingSubscriber")
    }
}

impl_owned_undeclare!(LivelinessToken, PublicationCache, QueryingSubscriber);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::Callback;
    use crate::config::Config;
    use crate::engine::Session;
    use crate::engine::mock::MockEngine;
    use crate::keyexpr::KeyExpr;
    use crate::payload::Sample;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ke(s: &str) -> KeyExpr {
        KeyExpr::new(s).unwrap()
    }

    #[test]
    fn extended_entities_undeclare_exactly_once() {
        let engine = MockEngine::new();
        let session = Session::open(&engine, &Config::new()).unwrap();

        let mut token = session
            .loan()
            .declare_liveliness_token(&ke("alive/me"))
            .unwrap();
        let cache = session
            .loan()
            .declare_publication_cache(&ke("demo/**"), 8)
            .unwrap();

        token.undeclare().unwrap();
        token.undeclare().unwrap();
        assert!(!token.check());
        drop(cache);
        assert_eq!(engine.state.undeclare_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn querying_subscriber_receives_like_a_subscriber() {
        let engine = MockEngine::new();
        let session = Session::open(&engine, &Config::new()).unwrap();

        let received = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&received);
        let subscriber = session
            .loan()
            .declare_querying_subscriber(
                &ke("demo/**"),
                Callback::new(move |_: &Sample| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
        assert!(subscriber.check());

        engine.state.publish(&Sample::put(ke("demo/x"), "1"));
        assert_eq!(received.load(Ordering::SeqCst), 1);
    }
}
