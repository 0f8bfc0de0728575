//! Self-sorting collection implementations.
//!
//! The list is ordered by background workers rather than at insertion time:
//! pushes prepend in O(1) and sort workers bubble the chain into ascending
//! order using per-node locks. `CoarseSortedList` runs the same worker loop
//! behind a single mutex and serves as the contention baseline.

pub mod coarse_sorted_list;
pub mod lock_coupled_iter;
pub mod self_sorting_list;
mod sort_worker;

pub use coarse_sorted_list::CoarseSortedList;
pub use lock_coupled_iter::{LockCoupledIter, NodeRef};
pub use self_sorting_list::SelfSortingList;
