//! Reusable scenarios for the self-sorting list.
//!
//! Each scenario takes the number of sort workers so the integration tests
//! can run it across pool sizes.

pub mod self_sorting_list_stress_tests;

use std::thread;
use std::time::{Duration, Instant};

use crate::config::SortConfig;
use crate::data_structures::{IterableCollection, SelfSortingList};

/// Short idle interval and no backoff, so quiescence is reached in milliseconds.
pub fn fast_config(workers: usize) -> SortConfig {
    SortConfig::default()
        .with_workers(workers)
        .with_idle_interval(Duration::from_millis(1))
        .with_swap_backoff(Duration::ZERO)
}

/// Waits until a walk sees the list sorted and no swap happens for a while.
pub fn wait_until_quiescent<T>(list: &SelfSortingList<T>, timeout: Duration) -> bool
where
    T: Ord,
{
    let settle = list.config().idle_interval().max(Duration::from_millis(10)) * 5;
    let deadline = Instant::now() + timeout;

    while Instant::now() < deadline {
        let before = list.swap_count();
        if list.is_sorted_snapshot() {
            thread::sleep(settle);
            if list.swap_count() == before && list.is_sorted_snapshot() {
                return true;
            }
        } else {
            thread::sleep(Duration::from_millis(5));
        }
    }
    false
}

/// Number of values already present that are smaller than each new value,
/// summed over all pushes. Every push at the head creates exactly that many
/// inversions and every swap removes exactly one.
pub fn expected_swaps<T: Ord>(pushed: &[T]) -> u64 {
    (0..pushed.len())
        .map(|i| pushed[..i].iter().filter(|v| **v < pushed[i]).count() as u64)
        .sum()
}

/// Deterministic spread of distinct keys, zero-padded so string order matches
/// numeric order.
pub fn scrambled_keys(count: usize) -> Vec<String> {
    const STRIDE: usize = 7919;
    (0..count)
        .map(|i| format!("{:08}", (i * STRIDE) % count.max(1)))
        .collect()
}
