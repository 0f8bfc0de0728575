use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use thiserror::Error;

/// Returned by [`InterruptibleSleep::sleep`] once the sleeper was interrupted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("sleep interrupted")]
pub struct Interrupted;

// Timed sleep that can be cut short from another thread.
// Interruption is sticky: every sleep after `interrupt()` fails immediately.
//
pub struct InterruptibleSleep {
    interrupted: Mutex<bool>,
    condvar: Condvar,
}

impl Default for InterruptibleSleep {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptibleSleep {
    pub fn new() -> Self {
        InterruptibleSleep {
            interrupted: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    // Sleep for `duration` unless interrupted first.
    //
    pub fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let mut interrupted = self.interrupted.lock();

        match Instant::now().checked_add(duration) {
            Some(deadline) => {
                while !*interrupted {
                    if self.condvar.wait_until(&mut interrupted, deadline).timed_out() {
                        break;
                    }
                }
            }
            None => {
                while !*interrupted {
                    self.condvar.wait(&mut interrupted);
                }
            }
        }

        if *interrupted { Err(Interrupted) } else { Ok(()) }
    }

    // Wake every current sleeper and fail all future sleeps.
    //
    pub fn interrupt(&self) {
        let mut interrupted = self.interrupted.lock();
        *interrupted = true;
        self.condvar.notify_all();
    }

    pub fn is_interrupted(&self) -> bool {
        *self.interrupted.lock()
    }
}
