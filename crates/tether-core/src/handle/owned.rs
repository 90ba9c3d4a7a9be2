//! Owned handles and the capability traits behind the lifecycle verbs.

use tracing::debug;

/// A type that can live inside an [`Owned`] handle.
///
/// Implemented exactly once per concrete handle type; this impl is the
/// type's entry in the capability table. Teardown belongs in the type's own
/// `Drop` impl and must be best-effort: failures are absorbed (typically
/// logged), never propagated out of a finalizer.
pub trait Resource: Sized {
    /// Short kind name used in diagnostics and panic messages.
    const KIND: &'static str;
}

/// A resource with a borrowed representation.
///
/// Most resources loan themselves (`Loaned = Self`, see the `self_loaned!`
/// macro); container-like resources loan their interior, e.g. `Bytes` loans
/// `[u8]` and `KeyExpr` loans [`KeyExprStr`](crate::keyexpr::KeyExprStr).
pub trait Loanable: Resource {
    /// The borrowed representation handed out by the loan verbs.
    type Loaned: ?Sized;

    /// Borrows the loaned representation out of a live resource.
    fn loaned(&self) -> &Self::Loaned;
}

/// A [`Loanable`] resource whose interior may be mutated through a loan.
///
/// Restricted to the types that support exclusive interior mutation:
/// configuration, attachment maps, buffered readers, and the
/// synchronization primitives.
pub trait LoanableMut: Loanable {
    /// Mutably borrows the loaned representation out of a live resource.
    fn loaned_mut(&mut self) -> &mut Self::Loaned;
}

/// An owned handle: either live around a resource or inert.
///
/// The inert state is a first-class value — [`Owned::null`] constructs it,
/// [`Owned::check`] observes it, and [`Owned::finalize`] restores it after
/// dropping the resource. Because finalization always leaves the handle
/// inert, a second finalization is a no-op by construction.
///
/// Ownership transfer goes through [`Owned::take`], which nulls the source.
/// There is no way to null a live handle *without* running teardown: moves
/// make that misuse inexpressible.
pub struct Owned<R: Resource> {
    inner: Option<R>,
}

impl<R: Resource> Owned<R> {
    /// Constructs an inert handle.
    ///
    /// Safe to [`check`](Self::check) and [`finalize`](Self::finalize);
    /// loaning it is a contract violation (see [`loan`](Self::loan)).
    pub const fn null() -> Self {
        Self { inner: None }
    }

    /// Wraps a live resource.
    pub fn new(resource: R) -> Self {
        Self {
            inner: Some(resource),
        }
    }

    /// Returns whether the handle currently refers to a live resource.
    ///
    /// Pure; never changed by loans.
    pub fn check(&self) -> bool {
        self.inner.is_some()
    }

    /// Drops the resource (running its teardown) and leaves the handle
    /// inert. Finalizing an inert handle is a no-op.
    pub fn finalize(&mut self) {
        if let Some(resource) = self.inner.take() {
            debug!(kind = R::KIND, "finalizing handle");
            drop(resource);
        }
    }

    /// Moves the resource out, leaving the handle inert.
    ///
    /// Returns `None` if the handle was already inert.
    pub fn take(&mut self) -> Option<R> {
        self.inner.take()
    }

    /// Borrows the live resource, if any.
    pub fn get(&self) -> Option<&R> {
        self.inner.as_ref()
    }

    /// Mutably borrows the live resource, if any.
    pub fn get_mut(&mut self) -> Option<&mut R> {
        self.inner.as_mut()
    }
}

impl<R: Loanable> Owned<R> {
    /// Loans the resource's borrowed representation.
    ///
    /// Zero-cost and side-effect free; the loan borrows the handle, so it
    /// cannot outlive it.
    ///
    /// # Panics
    ///
    /// Panics if the handle is inert. Guard with [`check`](Self::check) or
    /// use [`try_loan`](Self::try_loan).
    pub fn loan(&self) -> &R::Loaned {
        match &self.inner {
            Some(resource) => resource.loaned(),
            None => panic!("loan on an inert `{}` handle", R::KIND),
        }
    }

    /// Loans the resource's borrowed representation, or `None` if inert.
    pub fn try_loan(&self) -> Option<&R::Loaned> {
        self.inner.as_ref().map(Loanable::loaned)
    }
}

impl<R: LoanableMut> Owned<R> {
    /// Mutably loans the resource's borrowed representation.
    ///
    /// The loan is exclusive for its lifetime; sequential mutable loans each
    /// observe the previous loan's mutations.
    ///
    /// # Panics
    ///
    /// Panics if the handle is inert. Guard with [`check`](Self::check) or
    /// use [`try_loan_mut`](Self::try_loan_mut).
    pub fn loan_mut(&mut self) -> &mut R::Loaned {
        match &mut self.inner {
            Some(resource) => resource.loaned_mut(),
            None => panic!("mutable loan on an inert `{}` handle", R::KIND),
        }
    }

    /// Mutably loans the resource's borrowed representation, or `None` if
    /// inert.
    pub fn try_loan_mut(&mut self) -> Option<&mut R::Loaned> {
        self.inner.as_mut().map(LoanableMut::loaned_mut)
    }
}

impl<R: Resource> Default for Owned<R> {
    fn default() -> Self {
        Self::null()
    }
}

impl<R: Resource> From<R> for Owned<R> {
    fn from(resource: R) -> Self {
        Self::new(resource)
    }
}

impl<R: Resource> std::fmt::Debug for Owned<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Owned")
            .field("kind", &R::KIND)
            .field("live", &self.check())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Resource that counts its teardowns.
    struct Probe {
        drops: Arc<AtomicUsize>,
        value: u32,
    }

    impl Resource for Probe {
        const KIND: &'static str = "probe";
    }

    impl Loanable for Probe {
        type Loaned = u32;

        fn loaned(&self) -> &u32 {
            &self.value
        }
    }

    impl LoanableMut for Probe {
        fn loaned_mut(&mut self) -> &mut u32 {
            &mut self.value
        }
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn probe(value: u32) -> (Owned<Probe>, Arc<AtomicUsize>) {
        let drops = Arc::new(AtomicUsize::new(0));
        let handle = Owned::new(Probe {
            drops: Arc::clone(&drops),
            value,
        });
        (handle, drops)
    }

    #[test]
    fn null_handle_is_inert() {
        let handle = Owned::<Probe>::null();
        assert!(!handle.check());
        assert!(handle.try_loan().is_none());
    }

    #[test]
    fn finalize_then_finalize_again() {
        let (mut handle, drops) = probe(1);
        assert!(handle.check());

        handle.finalize();
        assert!(!handle.check());
        assert_eq!(drops.load(Ordering::SeqCst), 1);

        // Second finalize must be a no-op.
        handle.finalize();
        assert!(!handle.check());
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn implicit_drop_runs_teardown_once() {
        let (handle, drops) = probe(1);
        drop(handle);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn loan_reflects_contents_and_preserves_liveness() {
        let (handle, _drops) = probe(42);
        assert_eq!(*handle.loan(), 42);
        assert!(handle.check());
        // Multiple immutable loans may coexist.
        let (a, b) = (handle.loan(), handle.loan());
        assert_eq!(*a, *b);
    }

    #[test]
    #[should_panic(expected = "inert `probe` handle")]
    fn loan_on_inert_panics() {
        let handle = Owned::<Probe>::null();
        let _ = handle.loan();
    }

    #[test]
    fn sequential_mutable_loans_compose() {
        let (mut handle, _drops) = probe(0);
        *handle.loan_mut() += 3;
        *handle.loan_mut() += 4;
        assert_eq!(*handle.loan(), 7);
    }

    #[test]
    fn take_nulls_the_source_without_teardown() {
        let (mut handle, drops) = probe(9);
        let resource = handle.take().unwrap();
        assert!(!handle.check());
        assert_eq!(drops.load(Ordering::SeqCst), 0);
        assert!(handle.take().is_none());
        drop(resource);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn independent_handles_never_alias() {
        let (mut first, first_drops) = probe(1);
        let (second, second_drops) = probe(2);

        first.finalize();
        assert!(!first.check());
        assert!(second.check());
        assert_eq!(first_drops.load(Ordering::SeqCst), 1);
        assert_eq!(second_drops.load(Ordering::SeqCst), 0);
    }
}
