//! The main Bus implementation.
//!
//! The Bus is the primary interface for publishing events and creating
//! subscriptions. Publishing is synchronous: matching handlers run on the
//! publishing thread before `publish` returns. Subscriptions are owned by
//! [`Anchor`]s, whose drop removes them and waits out in-flight handlers
//! on other threads.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::dispatcher;
use crate::event::EventTuple;
use crate::registry::Database;
use crate::select::SelectorSpec;
use crate::subscription::entry::TypedEntry;
use crate::subscription::linker::Linker;
use crate::subscription::{Anchor, Handler};

pub mod builder;
pub mod config;

pub use builder::BusBuilder;
pub use config::BusConfig;

/// A typed, content-filtered, in-process publish/subscribe bus.
///
/// Events are ordered tuples of values; a subscription names a handler
/// whose argument list fixes the event shape it listens on, plus optional
/// per-position selectors that filter by value. Only events whose shape
/// and per-position values satisfy every selector reach the handler.
///
/// The bus is cheap to clone (clones share all state) and every entry
/// point may be called from any thread, including from inside handlers.
///
/// # Example
///
/// ```rust
/// use selectbus::select::ge;
/// use selectbus::Bus;
///
/// let bus = Bus::new();
///
/// // Exact-value selection: fires for error code 42 only.
/// let _on_42 = bus.subscribe(|code: &u32| println!("code {code}"), (42u32,));
///
/// // Range selection on the first position, anything in the second.
/// let _on_big = bus.subscribe(
///     |code: &u32, message: &String| println!("{code}: {message}"),
///     (ge(500u32),),
/// );
///
/// bus.publish((42u32,));
/// bus.publish((503u32, String::from("unavailable")));
/// ```
#[derive(Clone, Default)]
pub struct Bus {
    pub(crate) data: Arc<Database>,
}

impl Bus {
    /// Create a bus with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new Bus builder
    pub fn builder() -> BusBuilder {
        BusBuilder::new()
    }

    /// Publish an event tuple to all matching subscriptions.
    ///
    /// Handlers run synchronously on this thread, in database traversal
    /// order; for a fixed set of subscriptions that order is stable. A
    /// handler may publish recursively on the same bus, subscribe, and
    /// drop anchors (including its own, via
    /// [`Terminator`](crate::Terminator)).
    ///
    /// # Panics
    ///
    /// A panic raised by a handler propagates to the caller; remaining
    /// matched handlers are skipped and all locks are released.
    pub fn publish<E: EventTuple>(&self, event: E) {
        trace!(shape = %E::shape(), "publishing event");
        dispatcher::dispatch(&self.data, &event);
    }

    /// Subscribe a handler, returning the [`Anchor`] owning the
    /// subscription.
    ///
    /// The handler's argument list (one reference per tuple position)
    /// fixes the event shape. `selectors` is a tuple of at most that many
    /// selectors; missing trailing positions match anything. Pass `()` to
    /// receive every event of the shape.
    pub fn subscribe<E, S, F>(&self, handler: F, selectors: S) -> Anchor
    where
        E: EventTuple,
        F: Handler<E>,
        S: SelectorSpec<E>,
    {
        let linker = Arc::new(Linker::new(Arc::downgrade(&self.data)));
        self.data.insert(
            &linker,
            Box::new(TypedEntry::new(handler, selectors.into_full())),
        );
        Anchor::new(linker)
    }

    /// Create an empty [`Anchor`] for later
    /// [`add`](crate::Anchor::add)s. All subscriptions accumulated on it
    /// share one teardown.
    pub fn make_anchor(&self) -> Anchor {
        Anchor::new(Arc::new(Linker::new(Arc::downgrade(&self.data))))
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus").finish_non_exhaustive()
    }
}
