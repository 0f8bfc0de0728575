use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use crate::config::SortConfig;
use crate::error::{ChainSortError, Result};
use crate::line_chunks::line_chunks;
use crate::preemptive_synchronization::{CountdownEvent, Interrupted, InterruptibleSleep};

///
/// Self-sorting list behind one global lock.
///
/// Same contract as `SelfSortingList` (prepend, background bubble passes with
/// IDLE and swap backoff, swap counter, cooperative shutdown) but every push,
/// read and sort step takes the same mutex. Used as the contention baseline the
/// lock-coupled list is measured against.
///
// ┌─────────────── Mutex ───────────────┐
// │  [0] c   [1] a   [2] b   ...        │
// └─────────────────────────────────────┘
//      ▲
//      └── push() locks everything and inserts at index 0.
//
// A sort step locks, compares items[i] and items[i + 1], maybe swaps, and
// unlocks. The backoff sleep happens outside the lock.
//
pub struct CoarseSortedList<T> {
    state: Arc<CoarseState<T>>,
    workers: Vec<JoinHandle<()>>,
}

struct CoarseState<T> {
    items: Mutex<VecDeque<T>>,
    running: AtomicBool,
    swap_count: AtomicU64,
    sleeper: InterruptibleSleep,
    exited: CountdownEvent,
    config: SortConfig,
}

impl<T> CoarseState<T> {
    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl<T> CoarseSortedList<T>
where
    T: Ord + Send + 'static,
{
    /// Creates the list and starts `config.workers` sort workers.
    pub fn new(config: SortConfig) -> Result<Self> {
        config.validate()?;

        let worker_count = config.workers;
        let state = Arc::new(CoarseState {
            items: Mutex::new(VecDeque::new()),
            running: AtomicBool::new(true),
            swap_count: AtomicU64::new(0),
            sleeper: InterruptibleSleep::new(),
            exited: CountdownEvent::new(worker_count),
            config,
        });
        let mut workers = Vec::with_capacity(worker_count);

        for index in 0..worker_count {
            let state_clone = Arc::clone(&state);
            let spawned = thread::Builder::new()
                .name(format!("chainsort-coarse-{index}"))
                .spawn(move || coarse_worker(index, &state_clone));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    warn!(worker = index, error = %err, "failed to spawn coarse sort worker");
                    state.running.store(false, Ordering::Release);
                    state.sleeper.interrupt();
                    for handle in workers {
                        let _ = handle.join();
                    }
                    return Err(ChainSortError::WorkerSpawn(err));
                }
            }
        }

        info!(workers = worker_count, "coarse sorted list started");
        Ok(CoarseSortedList { state, workers })
    }

    pub fn with_workers(workers: usize) -> Result<Self> {
        Self::new(SortConfig::default().with_workers(workers))
    }
}

impl<T> CoarseSortedList<T> {
    pub fn push(&self, item: T) {
        self.state.items.lock().push_front(item);
    }

    /// Copies the contents in order while holding the global lock.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.state.items.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.items.lock().is_empty()
    }

    pub fn is_sorted_snapshot(&self) -> bool
    where
        T: Ord,
    {
        let items = self.state.items.lock();
        items.iter().zip(items.iter().skip(1)).all(|(a, b)| a <= b)
    }

    /// Clears the running flag; true for the call that changed it.
    pub fn shutdown(&self) -> bool {
        self.state.running.swap(false, Ordering::AcqRel)
    }

    pub fn interrupt(&self) {
        self.state.sleeper.interrupt();
    }

    pub fn await_termination(&self, grace: Duration) -> bool {
        self.state.exited.wait_timeout(grace)
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn swap_count(&self) -> u64 {
        self.state.swap_count.load(Ordering::Relaxed)
    }

    pub fn config(&self) -> &SortConfig {
        &self.state.config
    }
}

impl CoarseSortedList<String> {
    /// Pushes `line` in pieces of at most `chunk_width` characters.
    pub fn push_line(&self, line: &str) -> usize {
        let mut pushed = 0;
        for chunk in line_chunks(line, self.state.config.chunk_width) {
            self.push(chunk.to_string());
            pushed += 1;
        }
        pushed
    }
}

impl<T> Drop for CoarseSortedList<T> {
    fn drop(&mut self) {
        self.state.running.store(false, Ordering::Release);
        self.state.sleeper.interrupt();

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("coarse sort worker panicked");
            }
        }
    }
}

fn coarse_worker<T: Ord>(index: usize, state: &CoarseState<T>) {
    debug!(worker = index, "coarse sort worker started");

    match sort_until_stopped(index, state) {
        Ok(()) => debug!(worker = index, "coarse sort worker stopped"),
        Err(Interrupted) => info!(worker = index, "coarse sort worker interrupted, exiting"),
    }
    state.exited.signal();
}

fn sort_until_stopped<T: Ord>(index: usize, state: &CoarseState<T>) -> std::result::Result<(), Interrupted> {
    while state.is_running() {
        state.sleeper.sleep(state.config.idle_interval())?;

        while state.is_running() {
            let swaps = coarse_pass(state)?;
            trace!(worker = index, swaps, "coarse sort pass finished");
            if swaps == 0 {
                break;
            }
        }
    }
    Ok(())
}

/// One left-to-right scan by index, taking the global lock per step.
fn coarse_pass<T: Ord>(state: &CoarseState<T>) -> std::result::Result<u64, Interrupted> {
    let backoff = state.config.swap_backoff();
    let mut swaps = 0;
    let mut i = 0;

    loop {
        let swapped = {
            let mut items = state.items.lock();
            if i + 1 >= items.len() {
                return Ok(swaps);
            }
            if items[i] > items[i + 1] {
                items.swap(i, i + 1);
                state.swap_count.fetch_add(1, Ordering::Relaxed);
                true
            } else {
                false
            }
        };

        if swapped {
            swaps += 1;
            state.sleeper.sleep(backoff)?;
        }
        i += 1;
    }
}
