//! Iteration trait for collections shared between threads.
//!
//! Items are handles that dereference to the stored value rather than plain
//! references, so they stay valid while other threads keep mutating the
//! collection's structure.

use std::ops::Deref;

/// Trait for collections that support concurrent-safe iteration.
///
pub trait IterableCollection<T> {
    /// Handle yielded during iteration.
    type GuardedRef<'a>: Deref<Target = T>
    where
        Self: 'a;

    /// Iterator type that yields guarded references.
    type Iter<'a>: Iterator<Item = Self::GuardedRef<'a>>
    where
        Self: 'a;

    /// Returns an iterator over all elements in the collection.
    fn iter(&self) -> Self::Iter<'_>;

    /// Collects all elements into a Vec (convenience method).
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone;

    /// Returns the number of elements in the collection.
    fn len(&self) -> usize;

    /// Returns true if the collection is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if one walk observes the elements in ascending order.
    ///
    /// While the collection is being reordered concurrently this describes the
    /// walk, not a single instant.
    fn is_sorted_snapshot(&self) -> bool
    where
        T: Ord,
    {
        let mut iter = self.iter();
        let Some(mut previous) = iter.next() else {
            return true;
        };
        for current in iter {
            if *current < *previous {
                return false;
            }
            previous = current;
        }
        true
    }
}
