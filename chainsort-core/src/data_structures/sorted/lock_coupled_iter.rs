//! Hand-over-hand iterator for SelfSortingList.

use std::fmt;
use std::iter::FusedIterator;
use std::mem;
use std::ops::Deref;
use std::sync::Arc;

use crate::data_structures::internal::{LinkGuard, LockedNode};

// ============================================================================
// NodeRef - value handle yielded by the iterator
// ============================================================================

/// Shared handle to a node's value.
///
/// Values are immutable, so the handle needs no lock and stays valid after the
/// iterator has moved on (or the node has been reordered).
pub struct NodeRef<T> {
    node: Arc<LockedNode<T>>,
}

impl<T> NodeRef<T> {
    fn new(node: Arc<LockedNode<T>>) -> Self {
        NodeRef { node }
    }
}

impl<T> Deref for NodeRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.node.value()
    }
}

impl<T> Clone for NodeRef<T> {
    fn clone(&self) -> Self {
        NodeRef {
            node: Arc::clone(&self.node),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for NodeRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.deref(), f)
    }
}

impl<T: fmt::Display> fmt::Display for NodeRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.deref(), f)
    }
}

// ============================================================================
// LockCoupledIter
// ============================================================================

enum Cursor<T> {
    /// Head not locked yet.
    Unstarted,
    /// Holding the lock of the last yielded node (or the head).
    At(LinkGuard<T>),
    Done,
}

/// Lazy, forward-only iterator over a self-sorting list.
///
/// To advance, the successor is locked before the current node is released,
/// so at most two locks are held and always in chain order. A sort worker can
/// never relink an edge the iterator is standing on. The walk does not see a
/// single snapshot: swaps ahead of the cursor show up in the output.
///
/// The head is locked on the first call to `next`, not at construction, and
/// released on the first hop, so pushes never wait on a started iterator.
///
/// Node locks are not reentrant: a second walk started on the thread that
/// owns an unfinished iterator deadlocks on the node this cursor holds.
pub struct LockCoupledIter<'a, T> {
    head: &'a Arc<LockedNode<T>>,
    cursor: Cursor<T>,
}

impl<'a, T> LockCoupledIter<'a, T> {
    pub(crate) fn new(head: &'a Arc<LockedNode<T>>) -> Self {
        LockCoupledIter {
            head,
            cursor: Cursor::Unstarted,
        }
    }
}

impl<T> Iterator for LockCoupledIter<'_, T> {
    type Item = NodeRef<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let guard = match mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Unstarted => self.head.lock_link(),
            Cursor::At(guard) => guard,
            Cursor::Done => return None,
        };

        // End of chain: `guard` drops here and releases the last lock.
        let next = guard.next_node()?;

        debug_assert!(!next.is_sentinel());
        let next_guard = next.lock_link();
        drop(guard);
        self.cursor = Cursor::At(next_guard);

        Some(NodeRef::new(next))
    }
}

impl<T> FusedIterator for LockCoupledIter<'_, T> {}

// ============================================================================
// Tests
// ============================================================================
