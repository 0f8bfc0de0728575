//! Internal implementation details.
//!
//! These are pub(crate) and not intended for external use.

pub mod locked_node;

pub(crate) use locked_node::{LinkGuard, LockedNode};
