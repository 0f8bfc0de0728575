use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::RawMutex;
use parking_lot::lock_api::RawMutex as RawMutexApi;

/// Outgoing edge of a node.
pub(crate) type Link<T> = Option<Arc<LockedNode<T>>>;

///
/// Chain cell of a lock-coupled list.
///
/// The value is immutable once the node is created and can be read without
/// any lock. The `next` link is guarded by the node's own mutex: a node's lock
/// protects its outgoing edge, never its value.
///
// ┌──────┐ lock ┌──────┐ lock ┌──────┐
// │ HEAD │─────►│  b   │─────►│  a   │───► None
// │(sent)│      │      │      │      │
// └──────┘      └──────┘      └──────┘
//
// The only way to reach `next` is through a `LinkGuard`, which owns a strong
// reference to its node and releases the lock on drop. Guards can therefore be
// stored next to each other (hand-over-hand) without borrowing from a local.
//
pub struct LockedNode<T> {
    value: Option<T>,
    lock: RawMutex,
    next: UnsafeCell<Link<T>>,
}

impl<T> LockedNode<T> {
    #[cfg(test)]
    pub(crate) fn new(value: T) -> Self {
        Self::with_next(value, None)
    }

    /// Creates a node that already points at `next`.
    /// The node is not shared yet, so no lock is needed to set its link.
    pub(crate) fn with_next(value: T, next: Link<T>) -> Self {
        LockedNode {
            value: Some(value),
            lock: <RawMutex as RawMutexApi>::INIT,
            next: UnsafeCell::new(next),
        }
    }

    pub(crate) fn new_sentinel() -> Self {
        LockedNode {
            value: None,
            lock: <RawMutex as RawMutexApi>::INIT,
            next: UnsafeCell::new(None),
        }
    }

    pub(crate) fn is_sentinel(&self) -> bool {
        self.value.is_none()
    }

    /// Immutable payload of the node.
    pub fn value(&self) -> &T {
        self.value
            .as_ref()
            .expect("Cannot get value from sentinel node")
    }

    /// Blocks until this node's lock is held and returns a guard over its link.
    #[inline]
    pub(crate) fn lock_link(self: &Arc<Self>) -> LinkGuard<T> {
        self.lock.lock();
        LinkGuard {
            node: Arc::clone(self),
            _not_send: PhantomData,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for LockedNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => f.debug_tuple("LockedNode").field(value).finish(),
            None => f.write_str("LockedNode(<sentinel>)"),
        }
    }
}

// `next` is only touched while `lock` is held.
//
unsafe impl<T: Send + Sync> Send for LockedNode<T> {}
unsafe impl<T: Send + Sync> Sync for LockedNode<T> {}

/// Exclusive access to one node's outgoing link.
///
/// The lock is released when the guard drops. The guard must stay on the
/// thread that acquired it.
pub(crate) struct LinkGuard<T> {
    node: Arc<LockedNode<T>>,
    _not_send: PhantomData<*const ()>,
}

impl<T> LinkGuard<T> {
    /// Strong reference to the successor, if any.
    #[inline]
    pub(crate) fn next_node(&self) -> Link<T> {
        self.deref().clone()
    }
}

impl<T> Deref for LinkGuard<T> {
    type Target = Link<T>;

    fn deref(&self) -> &Self::Target {
        // SAFETY: the guard holds `node.lock`.
        unsafe { &*self.node.next.get() }
    }
}

impl<T> DerefMut for LinkGuard<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: the guard holds `node.lock` exclusively.
        unsafe { &mut *self.node.next.get() }
    }
}

impl<T> Drop for LinkGuard<T> {
    fn drop(&mut self) {
        // SAFETY: the lock was acquired in `lock_link` on this thread.
        unsafe { self.node.lock.unlock() }
    }
}

// ============================================================================
// Tests
// ============================================================================
