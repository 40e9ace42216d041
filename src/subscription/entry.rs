//! Type-erased subscription entries.
//!
//! A subscription is monomorphized over its event shape, selector tuple,
//! and handler type at the `subscribe`/`add` call site, then stored behind
//! [`EntryOps`]: a small table of shape tokens, comparisons, and an invoke
//! hook. The registry only ever compares entries against peers in the same
//! group and against events of the group's own shape, so the downcasts
//! inside the table are anchored by the group keys.

use std::any::Any;
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Weak;

use uuid::Uuid;

use crate::event::{EventTuple, ShapeToken};
use crate::select::SelectorTuple;

use super::handler::Handler;
use super::linker::Linker;

/// Operations a dispatch/registry path needs from an erased subscription.
pub(crate) trait EntryOps: Send + Sync {
    /// Shape token of the event tuple this entry listens on.
    fn event_shape(&self) -> ShapeToken;

    /// Shape token of the full selector tuple.
    fn selector_shape(&self) -> ShapeToken;

    /// The selector tuple, for peer comparison across erased entries.
    fn selectors(&self) -> &dyn Any;

    /// Total order against a peer entry of the same selector shape.
    fn cmp_entry(&self, other: &dyn EntryOps) -> Ordering;

    /// Lexicographic order of this entry's selectors against an event
    /// tuple of this entry's event shape.
    fn cmp_event(&self, event: &dyn Any) -> Ordering;

    /// Run the handler on an event tuple of this entry's event shape.
    fn invoke(&self, event: &dyn Any);
}

/// The monomorphized entry body: selector tuple plus handler.
pub(crate) struct TypedEntry<E, S, F> {
    selectors: S,
    handler: F,
    _shape: PhantomData<fn(&E)>,
}

impl<E, S, F> TypedEntry<E, S, F>
where
    E: EventTuple,
    S: SelectorTuple<E>,
    F: Handler<E>,
{
    pub(crate) fn new(handler: F, selectors: S) -> Self {
        Self {
            selectors,
            handler,
            _shape: PhantomData,
        }
    }
}

impl<E, S, F> EntryOps for TypedEntry<E, S, F>
where
    E: EventTuple,
    S: SelectorTuple<E>,
    F: Handler<E>,
{
    fn event_shape(&self) -> ShapeToken {
        E::shape()
    }

    fn selector_shape(&self) -> ShapeToken {
        ShapeToken::of::<S>()
    }

    fn selectors(&self) -> &dyn Any {
        &self.selectors
    }

    fn cmp_entry(&self, other: &dyn EntryOps) -> Ordering {
        let peer = other
            .selectors()
            .downcast_ref::<S>()
            .expect("peer entry comes from a group keyed on this selector shape");
        self.selectors.cmp_tuple(peer)
    }

    fn cmp_event(&self, event: &dyn Any) -> Ordering {
        let event = event
            .downcast_ref::<E>()
            .expect("event comes from a bucket keyed on this event shape");
        self.selectors.cmp_event(event)
    }

    fn invoke(&self, event: &dyn Any) {
        let event = event
            .downcast_ref::<E>()
            .expect("event comes from a bucket keyed on this event shape");
        self.handler.invoke(event);
    }
}

/// One stored subscription: erased body plus lifecycle links.
///
/// The entry is shared (`Arc`) between the group that indexes it and the
/// linker chain that enumerates it at teardown; the back-reference to the
/// linker is weak so the anchor side owns the lifetime.
pub(crate) struct Entry {
    pub(crate) ops: Box<dyn EntryOps>,
    pub(crate) linker: Weak<Linker>,
    pub(crate) event_shape: ShapeToken,
    pub(crate) selector_shape: ShapeToken,
    pub(crate) id: Uuid,
}

impl Entry {
    pub(crate) fn new(ops: Box<dyn EntryOps>, linker: Weak<Linker>) -> Self {
        let event_shape = ops.event_shape();
        let selector_shape = ops.selector_shape();
        Self {
            ops,
            linker,
            event_shape,
            selector_shape,
            id: Uuid::new_v4(),
        }
    }
}
