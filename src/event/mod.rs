//! Event tuples and their shape identity.
//!
//! An event is an ordered tuple of values; its *shape* is the ordered
//! sequence of element types. [`EventTuple`] ties a Rust tuple type to its
//! [`ShapeToken`], which the registry uses to index subscriptions so that a
//! publish only ever examines subscriptions of the same shape.

pub mod shape;

pub use shape::ShapeToken;

/// A publishable event tuple.
///
/// Implemented for tuples of arity 1 through 5 whose elements are
/// `'static`. Events are built by the publisher and handed to handlers by
/// reference on the publishing thread, so elements do not need to be
/// `Clone`, `Send`, or `Sync`.
///
/// # Example
///
/// ```rust
/// use selectbus::event::{EventTuple, ShapeToken};
///
/// assert_eq!(<(u32, String)>::shape(), ShapeToken::of::<(u32, String)>());
/// ```
pub trait EventTuple: 'static {
    /// The shape token of this tuple type.
    fn shape() -> ShapeToken
    where
        Self: Sized;
}

macro_rules! impl_event_tuple {
    ($( ($($elem:ident),+) ),+ $(,)?) => {
        $(
            impl<$($elem: 'static),+> EventTuple for ($($elem,)+) {
                fn shape() -> ShapeToken {
                    ShapeToken::of::<Self>()
                }
            }
        )+
    };
}

impl_event_tuple!(
    (A),
    (A, B),
    (A, B, C),
    (A, B, C, D),
    (A, B, C, D, E),
);
