//! The subscription database.
//!
//! Two-level index `event_shape → selector_shape → Group` behind a single
//! process-wide reader-writer lock. [`Database::insert`] and
//! [`Database::release`] are writers; [`Database::match_event`] is a
//! reader and never runs user code while the lock is held. It collects
//! references and returns, so handlers always execute lock-free with
//! respect to the database.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::dispatcher::MatchList;
use crate::event::{EventTuple, ShapeToken};
use crate::subscription::entry::{Entry, EntryOps};
use crate::subscription::linker::Linker;

use super::group::Group;

type Buckets = HashMap<ShapeToken, HashMap<ShapeToken, Group>>;

/// Optional diagnostic writer, shared behind a mutex so concurrent
/// publishers do not interleave partial lines.
type DebugSink = Mutex<Box<dyn Write + Send>>;

pub(crate) struct Database {
    buckets: RwLock<Buckets>,
    debug_sink: Option<DebugSink>,
    prune_empty: bool,
}

impl Default for Database {
    fn default() -> Self {
        Database::new(false, None)
    }
}

impl Database {
    pub(crate) fn new(prune_empty: bool, debug_sink: Option<Box<dyn Write + Send>>) -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            debug_sink: debug_sink.map(Mutex::new),
            prune_empty,
        }
    }

    /// Insert a new entry owned by `linker`.
    ///
    /// The entry lands in the group for its (event-shape, selector-shape)
    /// pair and is linked into the anchor's chain under the same writer
    /// lock, so it is either reachable from both sides or from neither.
    pub(crate) fn insert(&self, linker: &Arc<Linker>, ops: Box<dyn EntryOps>) {
        let entry = Arc::new(Entry::new(ops, Arc::downgrade(linker)));
        {
            let mut buckets = self.buckets.write();
            buckets
                .entry(entry.event_shape)
                .or_default()
                .entry(entry.selector_shape)
                .or_default()
                .insert(entry.clone());
            linker.remember(entry.clone());
        }
        trace!(
            subscription_id = %entry.id,
            shape = %entry.event_shape,
            "subscription added"
        );
        self.debug_line(format_args!("added : {}", entry.event_shape));
    }

    /// Collect the entries matching `event`.
    ///
    /// Takes the reader lock, binary-searches every selector-shape group
    /// in the event's shape bucket, and returns weak references to the
    /// matches. Entries whose anchor is already mid-teardown (linker no
    /// longer upgradable) are skipped. The lock is released before this
    /// returns, so no handler runs under it.
    pub(crate) fn match_event<E: EventTuple>(&self, event: &E) -> MatchList {
        let mut hits = MatchList::new();
        let buckets = self.buckets.read();
        if let Some(groups) = buckets.get(&E::shape()) {
            for group in groups.values() {
                for entry in group.equal_range(event as &dyn Any) {
                    if entry.linker.upgrade().is_some() {
                        hits.push(Arc::downgrade(entry));
                    }
                }
            }
        } else {
            trace!(shape = %E::shape(), "no subscriptions for shape");
            self.debug_line(format_args!("no subscriptions for {}", E::shape()));
        }
        hits
    }

    /// Extract every entry of an anchor's chain from its group.
    ///
    /// Runs under the writer lock; the extracted entries are returned so
    /// the caller can drop them (and the handlers they carry) after all
    /// locks are released.
    pub(crate) fn release(&self, chain: &[Arc<Entry>]) -> Vec<Arc<Entry>> {
        let mut removed = Vec::with_capacity(chain.len());
        let mut buckets = self.buckets.write();
        for entry in chain {
            let Some(groups) = buckets.get_mut(&entry.event_shape) else {
                continue;
            };
            if let Some(group) = groups.get_mut(&entry.selector_shape) {
                if let Some(extracted) = group.remove(entry) {
                    removed.push(extracted);
                }
                if self.prune_empty && group.is_empty() {
                    groups.remove(&entry.selector_shape);
                }
            }
            if self.prune_empty && groups.is_empty() {
                buckets.remove(&entry.event_shape);
            }
        }
        drop(buckets);
        debug!(released = removed.len(), "released subscriptions");
        removed
    }

    fn debug_line(&self, line: fmt::Arguments<'_>) {
        if let Some(sink) = &self.debug_sink {
            let mut sink = sink.lock();
            let _ = writeln!(sink, "{line}");
        }
    }
}
