//! Ordered multiset of entries sharing one (event-shape, selector-shape)
//! pair.
//!
//! Entries are kept sorted by their composite selector tuple with each
//! position's native order. Event lookup binary-searches the same order,
//! so the entries matching an event are one contiguous run and lookup
//! never scans the whole group. Duplicate selector tuples are allowed and
//! sit next to each other.

use std::any::Any;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::subscription::entry::Entry;

#[derive(Default)]
pub(crate) struct Group {
    entries: Vec<Arc<Entry>>,
}

impl Group {
    /// Insert keeping sort order; equal tuples insert after their peers.
    pub(crate) fn insert(&mut self, entry: Arc<Entry>) {
        let at = self
            .entries
            .partition_point(|existing| existing.ops.cmp_entry(&*entry.ops) != Ordering::Greater);
        self.entries.insert(at, entry);
    }

    /// The contiguous run of entries whose selector tuple matches `event`.
    pub(crate) fn equal_range(&self, event: &dyn Any) -> &[Arc<Entry>] {
        let lower = self
            .entries
            .partition_point(|entry| entry.ops.cmp_event(event) == Ordering::Less);
        let upper = self
            .entries
            .partition_point(|entry| entry.ops.cmp_event(event) != Ordering::Greater);
        &self.entries[lower..upper]
    }

    /// Remove by entry identity, preserving order.
    pub(crate) fn remove(&mut self, entry: &Arc<Entry>) -> Option<Arc<Entry>> {
        let at = self
            .entries
            .iter()
            .position(|existing| Arc::ptr_eq(existing, entry))?;
        Some(self.entries.remove(at))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
