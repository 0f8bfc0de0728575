//! Data structures for concurrent collections.
//!
//! # Organization
//!
//! - [`sorted`] - Self-sorting lock-coupled list and its workers
//! - [`internal`] - Internal implementation details (pub(crate))

// Submodules
pub(crate) mod internal;
pub mod sorted;

// Top-level public modules
pub mod iterable_collection;

// Re-exports for convenience
pub use iterable_collection::IterableCollection;
pub use sorted::{CoarseSortedList, LockCoupledIter, NodeRef, SelfSortingList};
