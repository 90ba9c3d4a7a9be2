//! View handles over caller-owned memory.

/// A borrowed descriptor over memory the caller already owns.
///
/// Views are the stack-allocated counterpart to [`Owned`](super::Owned):
/// they support [`null`](View::null), [`check`](View::check) and
/// [`loan`](View::loan), but carry no finalization responsibility — there is
/// no `finalize` to misuse, and dropping a view never touches the underlying
/// memory.
///
/// The loan returned by a view carries the *original* borrow's lifetime, so
/// it may outlive the view value itself (but never the caller's memory).
pub struct View<'a, T: ?Sized> {
    inner: Option<&'a T>,
}

impl<'a, T: ?Sized> View<'a, T> {
    /// Constructs an inert view.
    pub const fn null() -> Self {
        Self { inner: None }
    }

    /// Borrows `target` without copying.
    pub const fn new(target: &'a T) -> Self {
        Self {
            inner: Some(target),
        }
    }

    /// Returns whether the view refers to live memory.
    pub const fn check(&self) -> bool {
        self.inner.is_some()
    }

    /// Loans the viewed memory.
    ///
    /// # Panics
    ///
    /// Panics if the view is inert. Guard with [`check`](Self::check) or use
    /// [`try_loan`](Self::try_loan).
    pub fn loan(&self) -> &'a T {
        match self.inner {
            Some(target) => target,
            None => panic!("loan on an inert view"),
        }
    }

    /// Loans the viewed memory, or `None` if the view is inert.
    pub const fn try_loan(&self) -> Option<&'a T> {
        self.inner
    }
}

impl<T: ?Sized> Default for View<'_, T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized> Clone for View<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for View<'_, T> {}

impl<T: ?Sized + std::fmt::Debug> std::fmt::Debug for View<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner {
            Some(target) => f.debug_tuple("View").field(&target).finish(),
            None => f.write_str("View(inert)"),
        }
    }
}
