//! Per-thread active context
//!
//! Each thread tracks, per parameter source, which test context and which
//! method context it is currently running. The pointers live in a
//! thread-local map keyed by source id, so two sources (for example two
//! engines in the same test binary) never see each other's pointers.
//!
//! An entry exists only while at least one pointer is set; clearing the
//! last pointer removes it. A thread therefore holds at most one entry per
//! source with an unfinished context on that thread, and dropping a source
//! only removes the dropping thread's entry.

use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    static ACTIVE: RefCell<HashMap<u64, ActiveContext>> = RefCell::new(HashMap::new());
}

/// The test and method contexts a thread is currently executing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveContext {
    /// Active test context id
    pub test: Option<String>,
    /// Active method context id
    pub method: Option<String>,
}

impl ActiveContext {
    /// No active contexts
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the active test context
    pub fn with_test(mut self, test: impl Into<String>) -> Self {
        self.test = Some(test.into());
        self
    }

    /// Sets the active method context
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Whether neither pointer is set
    pub fn is_empty(&self) -> bool {
        self.test.is_none() && self.method.is_none()
    }
}

/// The calling thread's context for source `owner`
pub(crate) fn current(owner: u64) -> ActiveContext {
    ACTIVE
        .try_with(|active| active.borrow().get(&owner).cloned().unwrap_or_default())
        .unwrap_or_default()
}

/// Mutates the calling thread's context for source `owner`
pub(crate) fn update(owner: u64, op: impl FnOnce(&mut ActiveContext)) {
    let _ = ACTIVE.try_with(|active| {
        let mut active = active.borrow_mut();
        let context = active.entry(owner).or_default();
        op(context);
        if context.is_empty() {
            active.remove(&owner);
        }
    });
}

/// Number of sources with an active context on the calling thread
#[cfg(test)]
pub(crate) fn tracked_sources() -> usize {
    ACTIVE.with(|active| active.borrow().len())
}

/// Drops the calling thread's context for source `owner`
pub(crate) fn forget(owner: u64) {
    let _ = ACTIVE.try_with(|active| active.borrow_mut().remove(&owner));
}
