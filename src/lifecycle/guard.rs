//! Re-entrancy guard for the core listener
//!
//! The chain raises a per-thread flag only while it is delivering an event
//! to the core listener. The core listener reads the flag to learn whether
//! it was reached through the chain or called directly by a test adapter.

use std::cell::Cell;

thread_local! {
    static DISPATCHING: Cell<bool> = const { Cell::new(false) };
}

/// How the core listener was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Delivered by the listener chain
    Chain,
    /// Called directly, outside any dispatch
    Direct,
}

/// Origin of a core-listener call on the current thread
pub fn current_origin() -> Origin {
    if DISPATCHING.with(Cell::get) {
        Origin::Chain
    } else {
        Origin::Direct
    }
}

/// Raises the dispatching flag until dropped
///
/// The previous value is restored on drop, including during unwinding.
#[derive(Debug)]
pub(crate) struct DispatchGuard {
    previous: bool,
}

impl DispatchGuard {
    pub(crate) fn enter() -> Self {
        Self {
            previous: DISPATCHING.with(|flag| flag.replace(true)),
        }
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        DISPATCHING.with(|flag| flag.set(self.previous));
    }
}
