use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

pub struct CountdownEvent {
    count: Mutex<usize>,
    condvar: Condvar,
    notified: AtomicBool,
}

impl CountdownEvent {
    // Create a new CountdownEvent with initial count.
    //
    pub fn new(count: usize) -> Self {
        CountdownEvent {
            count: Mutex::new(count),
            condvar: Condvar::new(),
            notified: AtomicBool::new(count == 0),
        }
    }

    // Signal the event, decrementing count by one.
    // Returns true for the signal that brought the count to zero.
    //
    pub fn signal(&self) -> bool {
        let mut count = self.count.lock();
        if *count == 0 {
            return false;
        }
        *count -= 1;
        if *count == 0 {
            self.notified.store(true, Ordering::Release);
            self.condvar.notify_all();
            true
        } else {
            false
        }
    }

    // Wait until count reaches zero.
    //
    pub fn wait(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.condvar.wait(&mut count);
        }
    }

    // Wait until count reaches zero or the timeout elapses.
    // Returns true if the count reached zero.
    //
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return true;
        };

        let mut count = self.count.lock();
        while *count > 0 {
            if self.condvar.wait_until(&mut count, deadline).timed_out() {
                return *count == 0;
            }
        }
        true
    }

    pub fn remaining(&self) -> usize {
        *self.count.lock()
    }

    pub fn is_set(&self) -> bool {
        self.notified.load(Ordering::Acquire)
    }
}
