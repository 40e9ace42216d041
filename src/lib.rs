//! # selectbus
//!
//! A typed, content-filtered, in-process publish/subscribe bus.
//!
//! ## Features
//!
//! - **Type-safe** events: an event is an ordered tuple of values, and a
//!   subscription only ever sees events of its exact shape
//! - **Content filtering**: per-position selectors (exact values, ordered
//!   ranges, bit masks, or match-anything) decide which events a handler
//!   receives, with indexed range lookup instead of linear scans
//! - **Anchored lifetimes**: dropping a subscription's anchor removes it
//!   and waits for handler invocations in flight on other threads
//! - **Thread-safe** and reentrant: publish, subscribe, and tear down from
//!   any thread, including from inside a running handler
//!
//! ## Quick Example
//!
//! ```rust
//! use selectbus::select::{ge, Any};
//! use selectbus::Bus;
//!
//! let bus = Bus::new();
//!
//! // Fires only for (42, _) events.
//! let anchor = bus.subscribe(
//!     |code: &u32, message: &String| println!("{code}: {message}"),
//!     (42u32, Any),
//! );
//!
//! // Fires for any first position with a message of at least "m".
//! let _other = bus.subscribe(
//!     |_: &u32, message: &String| println!("late alphabet: {message}"),
//!     (Any, ge(String::from("m"))),
//! );
//!
//! bus.publish((42u32, String::from("matched twice")));
//!
//! drop(anchor); // removes the first subscription
//! bus.publish((42u32, String::from("matched once")));
//! ```

#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    unreachable_pub
)]

/// Event tuples and shape tokens
pub mod event;

/// Error types and result aliases
pub mod error;

/// Selection predicates and composite selector tuples
pub mod select;

/// Subscription handlers, anchors, and terminators
pub mod subscription;

/// The main bus implementation
pub mod bus;

pub(crate) mod dispatcher;
pub(crate) mod registry;

// Re-export commonly used types
pub use bus::{Bus, BusBuilder, BusConfig};
pub use error::{Error, Result};
pub use event::EventTuple;
pub use select::{Selector, SelectorSpec};
pub use subscription::{Anchor, Handler, Terminator};

/// Prelude module for convenient imports
///
/// # Example
/// ```rust
/// use selectbus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bus::{Bus, BusBuilder, BusConfig};
    pub use crate::error::{Error, Result};
    pub use crate::select::{exact, ge, gt, le, lt, masked, Any, BitSelect, Selector};
    pub use crate::subscription::{Anchor, Terminator};
}
