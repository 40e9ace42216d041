//! Event dispatch: from a published tuple to handler invocations.
//!
//! Dispatch is synchronous and two-phased. The match phase runs under the
//! database reader lock and only collects references; the invoke phase
//! runs lock-free with respect to the database, taking each owning
//! anchor's shared lock around the handler call via [`CallGuard`]. Between
//! the phases only weak references are held, so an anchor torn down in the
//! window simply drops out instead of being invoked.

use std::any::Any;
use std::sync::Weak;

use smallvec::SmallVec;
use tracing::trace;

use crate::event::EventTuple;
use crate::registry::Database;
use crate::subscription::entry::Entry;
use crate::subscription::linker::CallGuard;

/// Matched entries for one publish.
///
/// Inline storage for one entry keeps the common zero-or-one-match publish
/// allocation free; larger fan-outs spill to the heap.
pub(crate) type MatchList = SmallVec<[Weak<Entry>; 1]>;

/// Invoke every live matching subscription for `event`, in database
/// traversal order.
///
/// A handler panic propagates to the caller; the anchor's shared lock is
/// still released by the guard, and remaining matches are not invoked.
pub(crate) fn dispatch<E: EventTuple>(database: &Database, event: &E) {
    let matches = database.match_event(event);
    trace!(shape = %E::shape(), candidates = matches.len(), "dispatching event");
    for candidate in matches {
        let Some(entry) = candidate.upgrade() else {
            continue;
        };
        let Some(linker) = entry.linker.upgrade() else {
            continue;
        };
        let _guard = CallGuard::protect(&linker);
        if linker.is_destroyed() {
            continue;
        }
        entry.ops.invoke(event as &dyn Any);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Database;
    use crate::subscription::entry::TypedEntry;
    use crate::subscription::linker::Linker;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn database() -> Arc<Database> {
        Arc::new(Database::new(false, None))
    }

    #[test]
    fn test_dispatch_invokes_matches() {
        let database = database();
        let linker = Arc::new(Linker::new(Arc::downgrade(&database)));
        let calls = Arc::new(AtomicUsize::new(0));
        let sink = calls.clone();
        database.insert(
            &linker,
            Box::new(TypedEntry::new(
                move |_: &u32| {
                    sink.fetch_add(1, Ordering::SeqCst);
                },
                (42u32,),
            )),
        );

        dispatch(&database, &(41u32,));
        dispatch(&database, &(42u32,));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_skips_torn_down_anchor() {
        let database = database();
        let linker = Arc::new(Linker::new(Arc::downgrade(&database)));
        let calls = Arc::new(AtomicUsize::new(0));
        let sink = calls.clone();
        database.insert(
            &linker,
            Box::new(TypedEntry::new(
                move |_: &u32| {
                    sink.fetch_add(1, Ordering::SeqCst);
                },
                (42u32,),
            )),
        );

        linker.destroy();
        dispatch(&database, &(42u32,));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_match_list_inlines_single_hit() {
        let list = MatchList::new();
        assert!(!list.spilled());
        assert_eq!(list.inline_size(), 1);
    }
}
