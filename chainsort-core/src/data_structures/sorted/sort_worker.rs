use std::sync::Arc;
use std::sync::atomic::Ordering;

use tracing::{debug, info, trace};

use super::self_sorting_list::ListState;
use crate::data_structures::internal::LockedNode;
use crate::preemptive_synchronization::Interrupted;

// =============================================================================
// SORT WORKER
// =============================================================================
//
// Each worker alternates between two states until `running` is cleared:
//
//   IDLE ──(idle_interval)──► PASS ──(swaps > 0)──► PASS
//    ▲                          │
//    └──────(no swaps)──────────┘
//
// `running` is checked only at these boundaries. A pass in progress always
// runs to its end; only `interrupt()` cuts a sleep short.
//
// One step of a pass locks a three-node window in chain order:
//
//   prev ──────► current1 ──────► current2 ──────► rest
//
// If current1 > current2 the window is relinked:
//
//   prev ──────► current2 ──────► current1 ──────► rest
//
// All three locks are released before the post-swap backoff. The next window
// starts at the node that is now first in the pair, so the element carried
// forward (the old current1) is compared against `rest` next.
//
// Lock order is always prev -> current1 -> current2, the same order push (head
// only) and the iterator (cursor -> next) use, so no cycle of waiters can form.
//
pub(crate) struct SortWorker<T> {
    index: usize,
    state: Arc<ListState<T>>,
}

/// Outcome of a single window step.
enum Step<T> {
    /// Fewer than two nodes follow `prev`.
    End,
    /// The pair was in order; continue from the returned node.
    Advanced(Arc<LockedNode<T>>),
    /// The pair was swapped; continue from the returned node.
    Swapped(Arc<LockedNode<T>>),
}

// Signals the exit countdown however the worker leaves its loop.
//
struct ExitNotifier<'a, T> {
    state: &'a ListState<T>,
}

impl<T> Drop for ExitNotifier<'_, T> {
    fn drop(&mut self) {
        self.state.exited.signal();
    }
}

impl<T: Ord> SortWorker<T> {
    pub(crate) fn new(index: usize, state: Arc<ListState<T>>) -> Self {
        SortWorker { index, state }
    }

    /// Worker thread body.
    pub(crate) fn run(self) {
        let _exit = ExitNotifier { state: &self.state };
        debug!(worker = self.index, "sort worker started");

        match self.sort_until_stopped() {
            Ok(()) => debug!(worker = self.index, "sort worker stopped"),
            Err(Interrupted) => info!(worker = self.index, "sort worker interrupted, exiting"),
        }
    }

    fn sort_until_stopped(&self) -> Result<(), Interrupted> {
        let config = &self.state.config;

        while self.state.is_running() {
            self.state.sleeper.sleep(config.idle_interval())?;

            // Repeat until a pass is stable.
            //
            while self.state.is_running() {
                let swaps = self.pass()?;
                trace!(worker = self.index, swaps, "sort pass finished");
                if swaps == 0 {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Runs one full left-to-right scan and returns the number of swaps it made.
    pub(crate) fn pass(&self) -> Result<u64, Interrupted> {
        let backoff = self.state.config.swap_backoff();
        let mut prev = Arc::clone(&self.state.head);
        let mut swaps = 0;

        loop {
            match self.step(&prev) {
                Step::End => return Ok(swaps),
                Step::Advanced(next) => prev = next,
                Step::Swapped(next) => {
                    swaps += 1;
                    self.state.sleeper.sleep(backoff)?;
                    prev = next;
                }
            }
        }
    }

    fn step(&self, prev: &Arc<LockedNode<T>>) -> Step<T> {
        let mut prev_link = prev.lock_link();
        let Some(current1) = prev_link.next_node() else {
            return Step::End;
        };

        let mut current1_link = current1.lock_link();
        let Some(current2) = current1_link.next_node() else {
            return Step::End;
        };

        let mut current2_link = current2.lock_link();

        if current1.value() <= current2.value() {
            return Step::Advanced(current1);
        }

        *current1_link = current2_link.take();
        *current2_link = Some(Arc::clone(&current1));
        *prev_link = Some(Arc::clone(&current2));
        self.state.swap_count.fetch_add(1, Ordering::Relaxed);

        // Guards drop in reverse order: current2, current1, prev.
        //
        Step::Swapped(current2)
    }
}
