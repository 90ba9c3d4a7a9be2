//! Fire-and-forget notify callbacks.

use tracing::error;

/// A notify callback whose payload is borrowed for the call's duration.
///
/// State machine: *unarmed* ([`Callback::null`]) → *armed*
/// ([`Callback::new`]) → *consumed* ([`Callback::finalize`], drop, or
/// [`Callback::finish`]). Captured state is released exactly once, at
/// consumption. There is no path from consumed back to armed other than
/// constructing a new handle.
pub struct Callback<T: ?Sized> {
    handler: Option<Box<dyn Fn(&T) + Send + Sync>>,
}

impl<T: ?Sized> Callback<T> {
    /// Constructs an unarmed callback.
    ///
    /// Calling it is a caller error; the call is logged and ignored, so an
    /// unarmed callback behaves like one armed with a no-op.
    pub const fn null() -> Self {
        Self { handler: None }
    }

    /// Arms a callback.
    ///
    /// The closure may be invoked from an engine delivery thread, so its
    /// captures must be `Send + Sync`.
    pub fn new(handler: impl Fn(&T) + Send + Sync + 'static) -> Self {
        Self {
            handler: Some(Box::new(handler)),
        }
    }

    /// Returns whether the callback is armed.
    pub fn check(&self) -> bool {
        self.handler.is_some()
    }

    /// Releases the captured state and leaves the handle unarmed.
    ///
    /// Finalizing an unarmed callback is a no-op.
    pub fn finalize(&mut self) {
        self.handler = None;
    }

    /// Invokes the callback with a borrowed payload.
    ///
    /// Does not consume the handle; may be invoked any number of times.
    pub fn call(&self, payload: &T) {
        match &self.handler {
            Some(handler) => handler(payload),
            None => error!("call on an unarmed callback"),
        }
    }

    /// Invokes the callback one final time and consumes the handle.
    ///
    /// The captured state is released immediately afterwards — the one-shot
    /// call contract for deliveries that end the stream.
    pub fn finish(self, payload: &T) {
        self.call(payload);
    }
}

impl<T: ?Sized> Default for Callback<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized> std::fmt::Debug for Callback<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback")
            .field("armed", &self.check())
            .finish()
    }
}

/// A notify callback that takes ownership of each payload.
///
/// Same lifecycle as [`Callback`]; the payload is handed over rather than
/// borrowed, so the callback decides how long it lives.
pub struct Consumer<T> {
    handler: Option<Box<dyn Fn(T) + Send + Sync>>,
}

impl<T> Consumer<T> {
    /// Constructs an unarmed consumer.
    pub const fn null() -> Self {
        Self { handler: None }
    }

    /// Arms a consumer.
    pub fn new(handler: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            handler: Some(Box::new(handler)),
        }
    }

    /// Returns whether the consumer is armed.
    pub fn check(&self) -> bool {
        self.handler.is_some()
    }

    /// Releases the captured state and leaves the handle unarmed.
    pub fn finalize(&mut self) {
        self.handler = None;
    }

    /// Invokes the callback, handing over the payload.
    ///
    /// On an unarmed consumer the call is logged and the payload dropped.
    pub fn call(&self, payload: T) {
        match &self.handler {
            Some(handler) => handler(payload),
            None => error!("call on an unarmed consumer; payload released"),
        }
    }

    /// Invokes the callback one final time and consumes the handle.
    pub fn finish(self, payload: T) {
        self.call(payload);
    }
}

impl<T> Default for Consumer<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> std::fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Consumer")
            .field("armed", &self.check())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Captured context whose teardown we can count.
    struct Context {
        calls: AtomicUsize,
        drops: Arc<AtomicUsize>,
    }

    impl Drop for Context {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting_callback() -> (Callback<u32>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let drops = Arc::new(AtomicUsize::new(0));
        let ctx = Context {
            calls: AtomicUsize::new(0),
            drops: Arc::clone(&drops),
        };
        let calls_out = Arc::clone(&calls);
        let callback = Callback::new(move |_: &u32| {
            ctx.calls.fetch_add(1, Ordering::SeqCst);
            calls_out.fetch_add(1, Ordering::SeqCst);
        });
        (callback, calls, drops)
    }

    #[test]
    fn n_calls_mean_n_invocations() {
        let (callback, calls, _drops) = counting_callback();
        for _ in 0..3 {
            callback.call(&7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn lifecycle_scenario() {
        // Arm, call three times, finalize, finalize again.
        let (mut callback, calls, drops) = counting_callback();
        assert!(callback.check());

        callback.call(&1);
        callback.call(&2);
        callback.call(&3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        callback.finalize();
        assert!(!callback.check());
        assert_eq!(drops.load(Ordering::SeqCst), 1);

        // Second finalize: no crash, no second teardown.
        callback.finalize();
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unarmed_call_is_a_noop() {
        let callback = Callback::<u32>::null();
        assert!(!callback.check());
        callback.call(&1);
    }

    #[test]
    fn finish_invokes_once_then_tears_down() {
        let (callback, calls, drops) = counting_callback();
        callback.finish(&1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn implicit_drop_tears_down_once() {
        let (callback, _calls, drops) = counting_callback();
        drop(callback);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn consumer_takes_ownership_of_payloads() {
        let received = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let consumer = Consumer::new(move |payload: String| {
            sink.lock().push(payload);
        });

        consumer.call(String::from("first"));
        consumer.call(String::from("second"));
        assert_eq!(*received.lock(), ["first", "second"]);
    }

    #[test]
    fn unarmed_consumer_releases_the_payload() {
        let drops = Arc::new(AtomicUsize::new(0));
        let payload = Context {
            calls: AtomicUsize::new(0),
            drops: Arc::clone(&drops),
        };
        let consumer = Consumer::<Context>::null();
        consumer.call(payload);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }
}
