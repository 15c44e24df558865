//! Debug-only reentrancy guard.
//!
//! The only user code the table runs is the caller's hash function, and it
//! runs mid-operation, while buckets and the live count may disagree. A
//! hash function that calls back into the same table would observe that
//! half-mutated state. In debug builds the guard turns such a callback
//! into a panic at the nested entry point; release builds compile it away.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-table entry flag. Public table methods open with
/// `let _g = self.reentrancy.enter();` and the returned guard re-arms the
/// flag on drop, including during unwinding.
#[derive(Debug)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    entered: Cell<bool>,
    // The table is single-threaded by design; stay !Send + !Sync.
    _not_send: PhantomData<*mut ()>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            entered: Cell::new(false),
            _not_send: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn enter(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.entered.replace(true),
                "hash function re-entered the table it serves"
            );
            return ReentrancyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return ReentrancyGuard { _marker: PhantomData };
        }
    }
}

pub(crate) struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _marker: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.entered.set(false);
    }
}
