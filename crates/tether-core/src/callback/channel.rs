//! Channel callbacks and FIFO channel construction.

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::error;

use crate::error::TryRecvError;

/// A callback whose `bool` return is a continuation signal.
///
/// Producers drive streaming deliveries (query replies, channeled queries)
/// by calling the channel callback once per event and checking the return:
/// `true` means keep delivering, `false` means stop. Cancellation is
/// cooperative and polling-based — the dispatcher only reports the bool, it
/// never enforces the stop itself.
pub struct ChannelCallback<T> {
    handler: Option<Box<dyn Fn(T) -> bool + Send + Sync>>,
}

impl<T> ChannelCallback<T> {
    /// Constructs an unarmed channel callback.
    pub const fn null() -> Self {
        Self { handler: None }
    }

    /// Arms a channel callback.
    pub fn new(handler: impl Fn(T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            handler: Some(Box::new(handler)),
        }
    }

    /// Returns whether the callback is armed.
    pub fn check(&self) -> bool {
        self.handler.is_some()
    }

    /// Releases the captured state and leaves the handle unarmed.
    pub fn finalize(&mut self) {
        self.handler = None;
    }

    /// Delivers one payload and returns the continuation signal.
    ///
    /// On an unarmed callback the payload is dropped and `false` is
    /// returned, so a producer mistakenly driving an unarmed stream
    /// quiesces instead of spinning.
    pub fn call(&self, payload: T) -> bool {
        match &self.handler {
            Some(handler) => handler(payload),
            None => {
                error!("call on an unarmed channel callback; stream stopped");
                false
            }
        }
    }

    /// Delivers one final payload and consumes the handle.
    pub fn finish(self, payload: T) -> bool {
        self.call(payload)
    }
}

impl<T> Default for ChannelCallback<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> std::fmt::Debug for ChannelCallback<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelCallback")
            .field("armed", &self.check())
            .finish()
    }
}

enum Rx<T> {
    Bounded(mpsc::Receiver<T>),
    Unbounded(mpsc::UnboundedReceiver<T>),
}

/// The receiving end of a FIFO channel.
///
/// Synchronous by design, like the rest of this layer: [`Receiver::recv`]
/// blocks the calling thread and must not be used from an async context.
pub struct Receiver<T> {
    rx: Mutex<Rx<T>>,
}

impl<T> Receiver<T> {
    /// Blocks until an item arrives.
    ///
    /// Returns `None` once the send end has been dropped and the queue is
    /// drained; every later call also returns `None`.
    pub fn recv(&self) -> Option<T> {
        match &mut *self.rx.lock() {
            Rx::Bounded(rx) => rx.blocking_recv(),
            Rx::Unbounded(rx) => rx.blocking_recv(),
        }
    }

    /// Returns an item if one is immediately available.
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        let result = match &mut *self.rx.lock() {
            Rx::Bounded(rx) => rx.try_recv(),
            Rx::Unbounded(rx) => rx.try_recv(),
        };
        result.map_err(|e| match e {
            mpsc::error::TryRecvError::Empty => TryRecvError::Empty,
            mpsc::error::TryRecvError::Disconnected => TryRecvError::Closed,
        })
    }

    /// Drains and returns every immediately-available item.
    pub fn drain(&self) -> Vec<T> {
        let mut items = Vec::new();
        while let Ok(item) = self.try_recv() {
            items.push(item);
        }
        items
    }
}

impl<T> std::fmt::Debug for Receiver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Receiver")
    }
}

/// A FIFO channel: a [`ChannelCallback`] send end paired with a
/// [`Receiver`].
///
/// The send end is handed to an event producer (for example
/// [`Session::get`](crate::engine::Session::get)); it reports `false` once
/// the receiver is gone, which is the producer's instruction to stop
/// delivering.
#[derive(Debug)]
pub struct Channel<T> {
    /// Producer-facing send end.
    pub send: ChannelCallback<T>,
    /// Consumer-facing receive end.
    pub recv: Receiver<T>,
}

impl<T: Send + 'static> Channel<T> {
    /// Creates a FIFO channel.
    ///
    /// With `bound == 0` the queue is unbounded. Otherwise the send end
    /// blocks while the queue is full, applying back-pressure to the
    /// producer thread.
    pub fn fifo(bound: usize) -> Self {
        fifo(bound)
    }

    /// Splits the channel into its two ends.
    pub fn split(self) -> (ChannelCallback<T>, Receiver<T>) {
        (self.send, self.recv)
    }
}

/// Creates a FIFO channel; see [`Channel::fifo`].
pub fn fifo<T: Send + 'static>(bound: usize) -> Channel<T> {
    if bound == 0 {
        let (tx, rx) = mpsc::unbounded_channel();
        Channel {
            send: ChannelCallback::new(move |payload| tx.send(payload).is_ok()),
            recv: Receiver {
                rx: Mutex::new(Rx::Unbounded(rx)),
            },
        }
    } else {
        let (tx, rx) = mpsc::channel(bound);
        Channel {
            send: ChannelCallback::new(move |payload| tx.blocking_send(payload).is_ok()),
            recv: Receiver {
                rx: Mutex::new(Rx::Bounded(rx)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn false_on_second_call_stops_a_compliant_loop() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&invocations);
        // True on the first invocation, false on the second.
        let callback = ChannelCallback::new(move |_: u32| {
            seen.fetch_add(1, Ordering::SeqCst) == 0
        });

        let queued = [1u32, 2, 3, 4, 5];
        for event in queued {
            if !callback.call(event) {
                break;
            }
        }
        assert_eq!(invocations.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unarmed_channel_callback_reports_stop() {
        let callback = ChannelCallback::<u32>::null();
        assert!(!callback.check());
        assert!(!callback.call(1));
    }

    #[test]
    fn finalize_is_idempotent() {
        let drops = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&drops);
        struct Guard(Arc<AtomicUsize>);
        impl Drop for Guard {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
        let guard = Guard(counter);
        let mut callback = ChannelCallback::new(move |_: u32| {
            let _ = &guard;
            true
        });

        callback.finalize();
        callback.finalize();
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert!(!callback.call(1));
    }

    #[test]
    fn fifo_preserves_order() {
        let channel = Channel::fifo(0);
        for i in 0..3u32 {
            assert!(channel.send.call(i));
        }
        assert_eq!(channel.recv.try_recv(), Ok(0));
        assert_eq!(channel.recv.try_recv(), Ok(1));
        assert_eq!(channel.recv.try_recv(), Ok(2));
        assert_eq!(channel.recv.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn send_reports_stop_once_receiver_is_gone() {
        let (send, recv) = Channel::fifo(0).split();
        assert!(send.call(1u32));
        drop(recv);
        assert!(!send.call(2));
    }

    #[test]
    fn recv_drains_then_observes_closure() {
        let (send, recv) = Channel::fifo(0).split();
        assert!(send.call(10u32));
        drop(send);
        assert_eq!(recv.recv(), Some(10));
        assert_eq!(recv.recv(), None);
        assert_eq!(recv.recv(), None);
        assert_eq!(recv.try_recv(), Err(TryRecvError::Closed));
    }

    #[test]
    fn bounded_fifo_applies_backpressure_without_loss() {
        let channel = Arc::new(Channel::<u32>::fifo(1));
        let consumer_side = Arc::clone(&channel);
        let consumer = std::thread::spawn(move || {
            let mut received = Vec::new();
            while let Some(item) = consumer_side.recv.recv() {
                received.push(item);
                if received.len() == 4 {
                    break;
                }
            }
            received
        });

        // The queue holds a single item; later sends block until the
        // consumer catches up.
        for i in 0..4u32 {
            assert!(channel.send.call(i));
        }
        let received = consumer.join().unwrap();
        assert_eq!(received, [0, 1, 2, 3]);
    }
}
