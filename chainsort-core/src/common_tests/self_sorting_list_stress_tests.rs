//! Stress scenarios for the self-sorting list.
//!
//! These run writers, readers and sort workers against one list at the same
//! time and check that no value is lost, duplicated, or walked forever.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use super::{expected_swaps, fast_config, wait_until_quiescent};
use crate::data_structures::SelfSortingList;

const QUIESCENCE_TIMEOUT: Duration = Duration::from_secs(60);

fn key(thread_id: usize, i: usize) -> String {
    format!("{:04}-{:06}", (i * 31 + thread_id * 17) % 1000, thread_id * 100_000 + i)
}

/// Concurrent writers never lose a push while workers keep reordering.
pub fn test_concurrent_pushes_no_loss(workers: usize) {
    let list = Arc::new(SelfSortingList::new(fast_config(workers)).unwrap());
    let num_threads = 6;
    let items_per_thread = 150;
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let list = Arc::clone(&list);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..items_per_thread {
                    list.push(key(thread_id, i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(list.len(), num_threads * items_per_thread);
    assert!(wait_until_quiescent(&list, QUIESCENCE_TIMEOUT));

    let mut expected: Vec<String> = (0..num_threads)
        .flat_map(|thread_id| (0..items_per_thread).map(move |i| key(thread_id, i)))
        .collect();
    expected.sort();
    assert_eq!(list.to_vec(), expected);
}

/// Readers walking during sorting and pushing always finish, never see a
/// value twice, and never miss a value pushed before the walk began.
pub fn test_iterate_during_sorting(workers: usize) {
    let list = Arc::new(SelfSortingList::new(fast_config(workers)).unwrap());
    let stop = Arc::new(AtomicBool::new(false));
    let pushed = Arc::new(AtomicUsize::new(0));
    let walks = Arc::new(AtomicUsize::new(0));
    let total = 2_000;

    let writer = {
        let list = Arc::clone(&list);
        let pushed = Arc::clone(&pushed);
        thread::spawn(move || {
            for i in 0..total {
                list.push(key(0, i));
                pushed.fetch_add(1, Ordering::Release);
                if i % 100 == 0 {
                    thread::yield_now();
                }
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let list = Arc::clone(&list);
            let stop = Arc::clone(&stop);
            let pushed = Arc::clone(&pushed);
            let walks = Arc::clone(&walks);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    let floor = pushed.load(Ordering::Acquire);

                    let mut seen = HashSet::new();
                    for value in list.iter() {
                        assert!(seen.insert((*value).clone()), "value seen twice: {value}");
                        assert!(seen.len() <= total, "walk exceeded pushed values");
                    }

                    assert!(seen.len() >= floor, "walk missed values pushed before it");
                    walks.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    thread::sleep(Duration::from_millis(200));
    stop.store(true, Ordering::Relaxed);

    for reader in readers {
        reader.join().unwrap();
    }

    assert!(walks.load(Ordering::Relaxed) > 0);
    assert_eq!(list.len(), total);
}

/// The swap counter never goes backwards, sampled while workers run.
pub fn test_swap_count_monotonic(workers: usize) {
    let list = Arc::new(SelfSortingList::new(fast_config(workers)).unwrap());
    let stop = Arc::new(AtomicBool::new(false));

    // Ascending pushes leave the chain fully reversed.
    for i in 0..400 {
        list.push(format!("{i:05}"));
    }

    let sampler = {
        let list = Arc::clone(&list);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut last = 0;
            let mut samples = 0usize;
            while !stop.load(Ordering::Relaxed) {
                let current = list.swap_count();
                assert!(current >= last, "swap count went from {last} to {current}");
                last = current;
                samples += 1;
            }
            samples
        })
    };

    assert!(wait_until_quiescent(&list, QUIESCENCE_TIMEOUT));
    stop.store(true, Ordering::Relaxed);

    assert!(sampler.join().unwrap() > 0);
}

/// Pushes interleaved with passes still end with the exact transposition count.
pub fn test_swap_count_with_interleaved_pushes(workers: usize) {
    let list = SelfSortingList::new(fast_config(workers)).unwrap();
    let mut pushed = Vec::new();

    for round in 0..10 {
        for i in 0..30 {
            let value = format!("{:03}", (i * 13 + round * 7) % 100);
            list.push(value.clone());
            pushed.push(value);
        }
        thread::sleep(Duration::from_millis(2));
    }

    assert!(wait_until_quiescent(&list, QUIESCENCE_TIMEOUT));
    assert_eq!(list.swap_count(), expected_swaps(&pushed));
    assert_eq!(list.len(), pushed.len());
}

/// Shutdown while readers and writers are active finishes within a grace period.
pub fn test_shutdown_under_load(workers: usize) {
    let list = Arc::new(SelfSortingList::new(fast_config(workers)).unwrap());
    let stop = Arc::new(AtomicBool::new(false));

    let writer = {
        let list = Arc::clone(&list);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut i = 0;
            while !stop.load(Ordering::Relaxed) {
                list.push(key(1, i % 5_000));
                i += 1;
                if i % 50 == 0 {
                    thread::sleep(Duration::from_millis(1));
                }
            }
            i
        })
    };

    let reader = {
        let list = Arc::clone(&list);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                let _ = list.len();
            }
        })
    };

    thread::sleep(Duration::from_millis(100));

    let start = Instant::now();
    list.shutdown();
    list.interrupt();
    assert!(list.await_termination(Duration::from_secs(10)));
    assert!(start.elapsed() < Duration::from_secs(10));

    let frozen = list.swap_count();
    stop.store(true, Ordering::Relaxed);
    let pushes = writer.join().unwrap();
    reader.join().unwrap();

    assert_eq!(list.swap_count(), frozen);
    assert_eq!(list.len(), pushes);
}
