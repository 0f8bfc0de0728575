pub mod common_tests;
pub mod config;
pub mod data_structures;
pub mod error;
pub mod line_chunks;
pub mod preemptive_synchronization;

// Re-export the main types for convenience
pub use config::{MAX_CHUNK_CHARS, MAX_WORKERS, SortConfig};
pub use data_structures::{CoarseSortedList, IterableCollection, LockCoupledIter, NodeRef, SelfSortingList};
pub use error::{ChainSortError, Result};
pub use line_chunks::{LineChunks, line_chunks};
