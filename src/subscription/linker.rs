//! Per-anchor lifecycle state.
//!
//! Every anchor owns a [`Linker`]: the chain of entries subscribed through
//! it, a reader-writer *anchor lock*, and the bookkeeping of which threads
//! are currently inside one of its handlers. The shared side of the anchor
//! lock is held for the duration of a handler invocation; teardown takes
//! the exclusive side, which is what makes `drop`/`terminate` wait for
//! in-flight handlers on other threads.
//!
//! The active-thread set has a solo fast path: as long as at most one
//! thread runs handlers on the anchor, membership is a single scalar
//! compare under the bookkeeping mutex, and only genuinely concurrent
//! anchors fall back to a hash set. `mark` reports `false` for a nested
//! call on the same thread, so a handler publishing reentrantly never
//! re-acquires the shared lock it already holds.

use std::collections::HashSet;
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, ThreadId};

use parking_lot::lock_api::RawRwLock as _;
use parking_lot::{Mutex, RawRwLock};
use tracing::debug;

use crate::registry::Database;

use super::entry::Entry;

/// Threads currently executing a handler owned by one anchor.
#[derive(Default)]
struct ActiveSet {
    solo: Option<ThreadId>,
    rest: HashSet<ThreadId>,
}

impl ActiveSet {
    /// Record `thread` as active. Returns `true` when this is the thread's
    /// first entry, i.e. the caller must acquire the shared lock.
    fn enter(&mut self, thread: ThreadId) -> bool {
        if self.rest.is_empty() {
            match self.solo {
                None => {
                    self.solo = Some(thread);
                    true
                }
                Some(current) if current == thread => false,
                Some(current) => {
                    self.rest.insert(current);
                    self.rest.insert(thread);
                    self.solo = None;
                    true
                }
            }
        } else {
            self.rest.insert(thread)
        }
    }

    /// Remove `thread`. Returns `true` when the thread was active, i.e. the
    /// caller must release the shared lock it acquired on entry.
    fn leave(&mut self, thread: ThreadId) -> bool {
        if self.rest.is_empty() {
            if self.solo == Some(thread) {
                self.solo = None;
                true
            } else {
                false
            }
        } else {
            self.rest.remove(&thread)
        }
    }
}

/// Shared lifecycle state behind an anchor.
pub(crate) struct Linker {
    database: Weak<Database>,
    entries: Mutex<Vec<Arc<Entry>>>,
    active: Mutex<ActiveSet>,
    // Anchor lock. Shared/exclusive acquisitions are paired manually
    // because the shared side is taken in `mark` and released in `unmark`
    // or `destroy`, across stack frames.
    guard: RawRwLock,
    destroyed: AtomicBool,
}

impl Linker {
    pub(crate) fn new(database: Weak<Database>) -> Self {
        Self {
            database,
            entries: Mutex::new(Vec::new()),
            active: Mutex::new(ActiveSet::default()),
            guard: RawRwLock::INIT,
            destroyed: AtomicBool::new(false),
        }
    }

    pub(crate) fn database(&self) -> &Weak<Database> {
        &self.database
    }

    /// Append an entry to this anchor's chain. Called by the registry while
    /// it holds the database writer lock.
    pub(crate) fn remember(&self, entry: Arc<Entry>) {
        self.entries.lock().push(entry);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True once teardown has begun; dispatch checks this after acquiring
    /// the shared lock so no handler starts after `destroy` has returned.
    pub(crate) fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    /// Record the current thread as executing a handler on this anchor.
    ///
    /// On the thread's first entry the anchor lock is acquired in shared
    /// mode and `true` is returned; a nested call on the same thread
    /// returns `false` and takes no lock.
    pub(crate) fn mark(&self) -> bool {
        let me = thread::current().id();
        let first = self.active.lock().enter(me);
        if first {
            self.guard.lock_shared();
        }
        first
    }

    /// Release the current thread's hold from [`Linker::mark`].
    ///
    /// Drops the shared lock only if this thread is recorded as active; a
    /// call on a thread that never marked (or whose hold was already
    /// released by `destroy`) is a no-op.
    pub(crate) fn unmark(&self) {
        let me = thread::current().id();
        let held = self.active.lock().leave(me);
        if held {
            // SAFETY: `leave` returned true, so this thread's matching
            // `enter` acquired the shared lock and nothing released it yet.
            unsafe { self.guard.unlock_shared() };
        }
    }

    /// Tear the anchor down.
    ///
    /// Takes the entry chain (repeat calls become no-ops), releases the
    /// calling thread's own shared hold so a handler can destroy its own
    /// anchor, then acquires the anchor lock exclusively. That acquisition
    /// blocks until every other thread's in-flight handler on this anchor
    /// has returned. The entries are then extracted from the database under
    /// its writer lock and dropped after all locks are released.
    pub(crate) fn destroy(&self) {
        let chain = mem::take(&mut *self.entries.lock());
        if chain.is_empty() {
            return;
        }
        self.destroyed.store(true, Ordering::Release);
        debug!(entries = chain.len(), "tearing down anchor");

        self.unmark();
        self.guard.lock_exclusive();
        let extracted = match self.database.upgrade() {
            Some(database) => database.release(&chain),
            None => Vec::new(),
        };
        // SAFETY: paired with `lock_exclusive` above.
        unsafe { self.guard.unlock_exclusive() };

        drop(extracted);
        drop(chain);
    }
}

/// Scope guard for one handler invocation on one anchor.
///
/// Marks on construction and unmarks on drop, so the shared lock is
/// released even when the handler panics. `claimed` mirrors what `mark`
/// reported; a nested invocation on the same thread owns no lock and
/// releases none.
pub(crate) struct CallGuard<'a> {
    linker: &'a Linker,
    claimed: bool,
}

impl<'a> CallGuard<'a> {
    pub(crate) fn protect(linker: &'a Linker) -> Self {
        let claimed = linker.mark();
        Self { linker, claimed }
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        if self.claimed {
            self.linker.unmark();
        }
    }
}
