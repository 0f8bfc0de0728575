//! Blocking synchronization primitives for OS threads.

pub mod countdown_event;
pub mod interruptible_sleep;

pub use countdown_event::CountdownEvent;
pub use interruptible_sleep::{InterruptibleSleep, Interrupted};
