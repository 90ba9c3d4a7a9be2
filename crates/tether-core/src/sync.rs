//! Synchronization primitive handles.
//!
//! Thin handle-family wrappers over `parking_lot`, so callers coordinating
//! with engine delivery threads can manage locks and condition variables
//! through the same lifecycle verbs as every other resource. Both types are
//! mutable-loan-capable.

use std::time::Duration;

use parking_lot::{Condvar as RawCondvar, Mutex as RawMutex, MutexGuard};

use crate::handle::{Loanable, LoanableMut, Resource};

/// A mutual-exclusion handle guarding a value.
pub struct Mutex<T = ()> {
    inner: RawMutex<T>,
}

impl<T> Mutex<T> {
    /// Wraps a value.
    pub fn new(value: T) -> Self {
        Self {
            inner: RawMutex::new(value),
        }
    }

    /// Acquires the lock, blocking until it is available.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock()
    }

    /// Acquires the lock if it is immediately available.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        self.inner.try_lock()
    }

    /// Consumes the handle and returns the guarded value.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<T: Send> Resource for Mutex<T> {
    const KIND: &'static str = "mutex";
}

impl<T: Send> Loanable for Mutex<T> {
    type Loaned = Self;

    fn loaned(&self) -> &Self {
        self
    }
}

impl<T: Send> LoanableMut for Mutex<T> {
    fn loaned_mut(&mut self) -> &mut Self {
        self
    }
}

impl<T: Default> Default for Mutex<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> std::fmt::Debug for Mutex<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Mutex")
    }
}

/// A condition variable handle, used with [`Mutex`].
#[derive(Default)]
pub struct Condvar {
    inner: RawCondvar,
}

impl Condvar {
    /// Creates a condition variable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until notified, atomically releasing the guard while waiting.
    pub fn wait<T>(&self, guard: &mut MutexGuard<'_, T>) {
        self.inner.wait(guard);
    }

    /// Like [`wait`](Self::wait) with a timeout; returns `true` if the wait
    /// timed out.
    pub fn wait_for<T>(&self, guard: &mut MutexGuard<'_, T>, timeout: Duration) -> bool {
        self.inner.wait_for(guard, timeout).timed_out()
    }

    /// Wakes one waiter; returns whether a thread was woken.
    pub fn notify_one(&self) -> bool {
        self.inner.notify_one()
    }

    /// Wakes every waiter; returns how many threads were woken.
    pub fn notify_all(&self) -> usize {
        self.inner.notify_all()
    }
}

impl Resource for Condvar {
    const KIND: &'static str = "condvar";
}

impl Loanable for Condvar {
    type Loaned = Self;

    fn loaned(&self) -> &Self {
        self
    }
}

impl LoanableMut for Condvar {
    fn loaned_mut(&mut self) -> &mut Self {
        self
    }
}

impl std::fmt::Debug for Condvar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Condvar")
    }
}
