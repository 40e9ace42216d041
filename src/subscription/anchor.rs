//! Anchors: the lifetime tokens owning subscriptions.

use std::fmt;
use std::sync::{Arc, Weak};

use tracing::trace;

use crate::error::{Error, Result};
use crate::event::EventTuple;
use crate::select::SelectorSpec;

use super::entry::TypedEntry;
use super::handler::Handler;
use super::linker::Linker;

/// Owner of one or more subscriptions.
///
/// Every subscription belongs to exactly one anchor. Dropping (or
/// [`reset`](Anchor::reset)ting) the anchor removes all of its
/// subscriptions and blocks until handler invocations in flight on other
/// threads have returned, so after the drop no handler owned by this
/// anchor runs again.
///
/// Anchors are move-only. A default-constructed anchor owns nothing and
/// rejects [`add`](Anchor::add).
///
/// # Example
///
/// ```rust
/// use selectbus::Bus;
///
/// let bus = Bus::new();
/// let mut anchor = bus.make_anchor();
/// anchor
///     .add(|n: &u32| println!("exactly 42: {n}"), (42u32,))
///     .unwrap();
/// bus.publish((42u32,));
/// drop(anchor); // subscription removed
/// bus.publish((42u32,)); // nobody listens
/// ```
#[must_use = "dropping the anchor immediately removes its subscriptions"]
#[derive(Default)]
pub struct Anchor {
    linker: Option<Arc<Linker>>,
}

impl Anchor {
    pub(crate) fn new(linker: Arc<Linker>) -> Self {
        Self {
            linker: Some(linker),
        }
    }

    /// Append another subscription owned by this anchor.
    ///
    /// The handler's argument list fixes the event shape; `selectors` is a
    /// tuple of at most that many selectors, with missing trailing
    /// positions matching anything. All subscriptions added here share this
    /// anchor's teardown.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAnchor`] if the anchor is default-constructed or
    /// already torn down. If the owning bus has been dropped the entry is
    /// silently discarded instead: no handler will ever run, but the
    /// anchor stays usable.
    pub fn add<E, S, F>(&mut self, handler: F, selectors: S) -> Result<&mut Self>
    where
        E: EventTuple,
        F: Handler<E>,
        S: SelectorSpec<E>,
    {
        let linker = self.linker.as_ref().ok_or(Error::InvalidAnchor)?;
        if linker.is_destroyed() {
            return Err(Error::InvalidAnchor);
        }
        if let Some(database) = linker.database().upgrade() {
            database.insert(
                linker,
                Box::new(TypedEntry::new(handler, selectors.into_full())),
            );
        } else {
            trace!(shape = %E::shape(), "bus gone, discarding subscription");
        }
        Ok(self)
    }

    /// Fluent variant of [`add`](Anchor::add), consuming and returning the
    /// anchor for chaining.
    ///
    /// # Errors
    ///
    /// As for [`add`](Anchor::add); the anchor is dropped (and thus torn
    /// down) on error.
    pub fn subscribe<E, S, F>(mut self, handler: F, selectors: S) -> Result<Anchor>
    where
        E: EventTuple,
        F: Handler<E>,
        S: SelectorSpec<E>,
    {
        self.add(handler, selectors)?;
        Ok(self)
    }

    /// A weak handle able to tear this anchor down, typically from inside
    /// one of its own handlers.
    pub fn terminator(&self) -> Terminator {
        Terminator {
            linker: self.linker.as_ref().map(Arc::downgrade).unwrap_or_default(),
        }
    }

    /// Number of subscriptions owned by this anchor.
    pub fn len(&self) -> usize {
        self.linker.as_ref().map_or(0, |linker| linker.len())
    }

    /// True if this anchor owns no subscriptions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tear down now instead of at drop. The anchor owns nothing
    /// afterwards.
    pub fn reset(&mut self) {
        if let Some(linker) = self.linker.take() {
            linker.destroy();
        }
    }
}

impl Drop for Anchor {
    fn drop(&mut self) {
        if let Some(linker) = self.linker.take() {
            linker.destroy();
        }
    }
}

impl fmt::Debug for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Anchor")
            .field("attached", &self.linker.is_some())
            .field("len", &self.len())
            .finish()
    }
}

/// Weak teardown handle on an [`Anchor`].
///
/// Holds no ownership: if the anchor is already gone,
/// [`terminate`](Terminator::terminate) does nothing. A handler that captures its own
/// anchor's terminator can remove itself mid-callback without deadlock;
/// the running invocation completes and the anchor is released on the next
/// reference drop.
#[derive(Clone, Default)]
pub struct Terminator {
    linker: Weak<Linker>,
}

impl Terminator {
    /// Tear the anchor down if it is still alive. Idempotent.
    pub fn terminate(&self) {
        if let Some(linker) = self.linker.upgrade() {
            linker.destroy();
        }
    }
}

impl fmt::Debug for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Terminator")
            .field("alive", &(self.linker.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_anchor_rejects_add() {
        let mut anchor = Anchor::default();
        let result = anchor.add(|_: &u32| {}, (1u32,));
        assert_eq!(result.err(), Some(Error::InvalidAnchor));
    }

    #[test]
    fn test_default_anchor_is_empty() {
        let anchor = Anchor::default();
        assert!(anchor.is_empty());
        assert_eq!(anchor.len(), 0);
    }

    #[test]
    fn test_default_terminator_is_inert() {
        let anchor = Anchor::default();
        anchor.terminator().terminate();
        Terminator::default().terminate();
    }
}
