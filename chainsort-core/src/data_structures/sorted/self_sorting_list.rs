use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::lock_coupled_iter::{LockCoupledIter, NodeRef};
use super::sort_worker::SortWorker;
use crate::config::SortConfig;
use crate::data_structures::IterableCollection;
use crate::data_structures::internal::LockedNode;
use crate::error::{ChainSortError, Result};
use crate::line_chunks::line_chunks;
use crate::preemptive_synchronization::{CountdownEvent, InterruptibleSleep};

///
/// Singly linked list that keeps sorting itself in the background.
///
/// A fixed pool of worker threads repeatedly bubble-sorts the chain in
/// ascending order while callers push new values at the head and iterate the
/// current contents. There is no global lock: every node carries its own mutex
/// guarding its outgoing link, and all parties lock nodes in chain order.
///
// ┌──────┐    ┌──────┐    ┌──────┐    ┌──────┐
// │ HEAD │───►│  c   │───►│  a   │───►│  b   │───► None
// │(sent)│    │      │    │      │    │      │
// └──────┘    └──────┘    └──────┘    └──────┘
//    ▲
//    └── push() locks HEAD only and prepends.
//
// INVARIANTS:
// 1. HEAD sentinel is always first and never yielded.
// 2. `next` is read or written only under its node's lock.
// 3. Nodes are never unlinked while the list is alive; workers only reorder.
// 4. Locks are always taken in chain order and never held across a sleep.
//
pub struct SelfSortingList<T> {
    state: Arc<ListState<T>>,
    workers: Vec<JoinHandle<()>>,
}

/// State shared between the list handle and its workers.
pub(crate) struct ListState<T> {
    pub(crate) head: Arc<LockedNode<T>>,
    pub(crate) running: AtomicBool,
    pub(crate) swap_count: AtomicU64,
    pub(crate) sleeper: InterruptibleSleep,
    pub(crate) exited: CountdownEvent,
    pub(crate) config: SortConfig,
}

impl<T> ListState<T> {
    pub(crate) fn new(config: SortConfig) -> Self {
        ListState {
            head: Arc::new(LockedNode::new_sentinel()),
            running: AtomicBool::new(true),
            swap_count: AtomicU64::new(0),
            sleeper: InterruptibleSleep::new(),
            exited: CountdownEvent::new(config.workers),
            config,
        }
    }

    /// Links a new node right after the sentinel.
    pub(crate) fn prepend(&self, value: T) {
        let mut head_link = self.head.lock_link();
        let node = LockedNode::with_next(value, head_link.take());
        *head_link = Some(Arc::new(node));
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Clears `running`; returns true if this call changed it.
    pub(crate) fn stop(&self) -> bool {
        self.running.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn swap_count(&self) -> u64 {
        self.swap_count.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub(crate) fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        LockCoupledIter::new(&self.head)
            .map(|node| (*node).clone())
            .collect()
    }
}

impl<T> SelfSortingList<T>
where
    T: Ord + Send + Sync + 'static,
{
    /// Creates the list and starts `config.workers` sort workers.
    pub fn new(config: SortConfig) -> Result<Self> {
        config.validate()?;

        let worker_count = config.workers;
        let state = Arc::new(ListState::new(config));
        let mut workers = Vec::with_capacity(worker_count);

        for index in 0..worker_count {
            let worker = SortWorker::new(index, Arc::clone(&state));
            let spawned = thread::Builder::new()
                .name(format!("chainsort-worker-{index}"))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    warn!(worker = index, error = %err, "failed to spawn sort worker");
                    state.stop();
                    state.sleeper.interrupt();
                    for handle in workers {
                        let _ = handle.join();
                    }
                    return Err(ChainSortError::WorkerSpawn(err));
                }
            }
        }

        info!(workers = worker_count, "self-sorting list started");
        Ok(SelfSortingList { state, workers })
    }

    /// Creates the list with default timings and `workers` sort workers.
    pub fn with_workers(workers: usize) -> Result<Self> {
        Self::new(SortConfig::default().with_workers(workers))
    }
}

impl<T> SelfSortingList<T> {
    /// Prepends `item` right after the sentinel.
    ///
    /// Only contends on the head lock, which is also the first lock of every
    /// sort pass. The value is visible to every traversal started after this
    /// call returns.
    pub fn push(&self, item: T) {
        self.state.prepend(item);
    }

    /// Returns a lazy iterator over the current contents.
    ///
    /// The iterator holds at most two node locks at a time; sort workers block
    /// on the nodes it currently covers. Pushing while it is unfinished is
    /// fine once it has yielded its first value.
    ///
    /// Node locks are not reentrant. Do not start a second walk (`iter`,
    /// `len`, `to_vec`, `is_empty`, `is_sorted_snapshot`) on the thread that
    /// owns an unfinished iterator: it blocks forever on the node the first
    /// cursor holds. Drop the iterator or collect it first.
    pub fn iter(&self) -> LockCoupledIter<'_, T> {
        LockCoupledIter::new(&self.state.head)
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().map(|node| (*node).clone()).collect()
    }

    /// Counts reachable values with one lock-coupled walk.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.state.head.lock_link().is_none()
    }

    /// Clears the shared `running` flag.
    ///
    /// Cooperative: workers notice at their next IDLE/PASS boundary and passes
    /// in progress run to completion. Returns true for the call that actually
    /// stopped the list; later calls do nothing.
    pub fn shutdown(&self) -> bool {
        let stopped = self.state.stop();
        if stopped {
            info!(swaps = self.swap_count(), "shutdown requested");
        }
        stopped
    }

    /// Wakes every sleeping worker; each logs the interruption and exits.
    /// Workers in the middle of a step exit at their next sleep.
    pub fn interrupt(&self) {
        debug!("interrupting sort workers");
        self.state.sleeper.interrupt();
    }

    /// Waits up to `grace` for all workers to exit.
    pub fn await_termination(&self, grace: Duration) -> bool {
        self.state.exited.wait_timeout(grace)
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Total adjacent transpositions performed by all workers since start.
    pub fn swap_count(&self) -> u64 {
        self.state.swap_count()
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn config(&self) -> &SortConfig {
        &self.state.config
    }
}

impl SelfSortingList<String> {
    /// Splits `line` into pieces of at most `chunk_width` characters and
    /// pushes them in order, so the last piece ends up nearest the head.
    /// Returns the number of pieces pushed.
    pub fn push_line(&self, line: &str) -> usize {
        let mut pushed = 0;
        for chunk in line_chunks(line, self.state.config.chunk_width) {
            self.push(chunk.to_string());
            pushed += 1;
        }
        pushed
    }
}

impl<T> Drop for SelfSortingList<T> {
    fn drop(&mut self) {
        self.state.stop();
        self.state.sleeper.interrupt();

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("sort worker panicked");
            }
        }

        // Unlink front to back so long chains don't drop recursively.
        //
        let mut link = self.state.head.lock_link().take();
        while let Some(node) = link {
            link = node.lock_link().take();
        }
    }
}

impl<'a, T> IntoIterator for &'a SelfSortingList<T> {
    type Item = NodeRef<T>;
    type IntoIter = LockCoupledIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IterableCollection<T> for SelfSortingList<T> {
    type GuardedRef<'a>
        = NodeRef<T>
    where
        Self: 'a;

    type Iter<'a>
        = LockCoupledIter<'a, T>
    where
        Self: 'a;

    fn iter(&self) -> Self::Iter<'_> {
        SelfSortingList::iter(self)
    }

    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        SelfSortingList::to_vec(self)
    }

    fn len(&self) -> usize {
        SelfSortingList::len(self)
    }

    fn is_empty(&self) -> bool {
        SelfSortingList::is_empty(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
