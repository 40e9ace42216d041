//! Subscription management: handlers, entries, anchors.
//!
//! This module owns the subscription side of the bus: the [`Handler`]
//! trait implemented by callbacks, the type-erased entries the registry
//! stores, and the [`Anchor`]/[`Terminator`] lifetime tokens with their
//! teardown protocol.

pub mod anchor;
pub(crate) mod entry;
pub mod handler;
pub(crate) mod linker;

pub use anchor::{Anchor, Terminator};
pub use handler::Handler;
