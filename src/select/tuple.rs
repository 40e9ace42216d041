//! Composite selector tuples.
//!
//! A subscription over an event shape `(T1, .., Tn)` carries one selector
//! per position. [`SelectorTuple`] gives the composite two orderings that
//! must agree: a total order against peer tuples of the same type (used to
//! keep a group sorted) and a lexicographic ordering against a live event
//! tuple (used for range lookup). Because both walk positions left to right
//! with each selector's native order, the entries equal to an event form a
//! contiguous run in a sorted group.
//!
//! [`SelectorSpec`] is the subscription-side sugar: the caller may pass
//! fewer selectors than the event has positions and the remainder are
//! filled with [`Any`].

use std::cmp::Ordering;

use super::Selector;

/// A full per-position selector tuple for event shape `E`.
pub trait SelectorTuple<E>: Send + Sync + 'static {
    /// Total order against a peer tuple, position by position.
    fn cmp_tuple(&self, other: &Self) -> Ordering;

    /// Lexicographic ordering of this tuple against an event tuple.
    ///
    /// Returns `Equal` exactly when every position matches its value.
    fn cmp_event(&self, event: &E) -> Ordering;
}

/// A possibly-partial selector list accepted by `subscribe`/`add`.
///
/// Implemented for tuples of selectors of length zero up to the event
/// arity; missing trailing positions become [`Any`].
pub trait SelectorSpec<E>: Send + Sync + 'static {
    /// The padded, full-arity selector tuple.
    type Full: SelectorTuple<E>;

    /// Pad with [`Any`] up to the event arity.
    fn into_full(self) -> Self::Full;
}

fn position_cmp<T, S: Selector<T>>(selector: &S, value: &T) -> Ordering {
    if selector.before_value(value) {
        Ordering::Less
    } else if selector.after_value(value) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Pad slot type; matches any value at position `T`, like [`Any`].
#[doc(hidden)]
pub struct AnyOf<T>(std::marker::PhantomData<fn() -> T>);

impl<T> std::fmt::Debug for AnyOf<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AnyOf")
    }
}

impl<T> Selector<T> for AnyOf<T>
where
    T: 'static,
{
    fn before_value(&self, _value: &T) -> bool {
        false
    }

    fn after_value(&self, _value: &T) -> bool {
        false
    }

    fn cmp_selector(&self, _other: &Self) -> Ordering {
        Ordering::Equal
    }
}

#[doc(hidden)]
pub fn any_slot<T>() -> AnyOf<T> {
    AnyOf(std::marker::PhantomData)
}

macro_rules! impl_selector_tuple {
    ($( ($($sel:ident => $elem:ident . $idx:tt),+) ),+ $(,)?) => {
        $(
            impl<$($elem,)+ $($sel,)+> SelectorTuple<($($elem,)+)> for ($($sel,)+)
            where
                $($elem: 'static,)+
                $($sel: Selector<$elem>,)+
            {
                fn cmp_tuple(&self, other: &Self) -> Ordering {
                    $(
                        match self.$idx.cmp_selector(&other.$idx) {
                            Ordering::Equal => {}
                            ord => return ord,
                        }
                    )+
                    Ordering::Equal
                }

                fn cmp_event(&self, event: &($($elem,)+)) -> Ordering {
                    $(
                        match position_cmp(&self.$idx, &event.$idx) {
                            Ordering::Equal => {}
                            ord => return ord,
                        }
                    )+
                    Ordering::Equal
                }
            }
        )+
    };
}

impl_selector_tuple!(
    (S0 => A.0),
    (S0 => A.0, S1 => B.1),
    (S0 => A.0, S1 => B.1, S2 => C.2),
    (S0 => A.0, S1 => B.1, S2 => C.2, S3 => D.3),
    (S0 => A.0, S1 => B.1, S2 => C.2, S3 => D.3, S4 => Z.4),
);

macro_rules! impl_selector_spec {
    ($(
        ( ($($elem:ident),+) ; ($($sel:ident => $selelem:ident . $sidx:tt),*) ; ($($pad:ident),*) )
    ),+ $(,)?) => {
        $(
            impl<$($elem,)+ $($sel,)*> SelectorSpec<($($elem,)+)> for ($($sel,)*)
            where
                $($elem: 'static,)+
                $($sel: Selector<$selelem>,)*
            {
                type Full = ($($sel,)* $(AnyOf<$pad>,)*);

                fn into_full(self) -> Self::Full {
                    ($(self.$sidx,)* $(any_slot::<$pad>(),)*)
                }
            }
        )+
    };
}

impl_selector_spec!(
    // arity 1
    ((A); (); (A)),
    ((A); (S0 => A.0); ()),
    // arity 2
    ((A, B); (); (A, B)),
    ((A, B); (S0 => A.0); (B)),
    ((A, B); (S0 => A.0, S1 => B.1); ()),
    // arity 3
    ((A, B, C); (); (A, B, C)),
    ((A, B, C); (S0 => A.0); (B, C)),
    ((A, B, C); (S0 => A.0, S1 => B.1); (C)),
    ((A, B, C); (S0 => A.0, S1 => B.1, S2 => C.2); ()),
    // arity 4
    ((A, B, C, D); (); (A, B, C, D)),
    ((A, B, C, D); (S0 => A.0); (B, C, D)),
    ((A, B, C, D); (S0 => A.0, S1 => B.1); (C, D)),
    ((A, B, C, D); (S0 => A.0, S1 => B.1, S2 => C.2); (D)),
    ((A, B, C, D); (S0 => A.0, S1 => B.1, S2 => C.2, S3 => D.3); ()),
    // arity 5
    ((A, B, C, D, Z); (); (A, B, C, D, Z)),
    ((A, B, C, D, Z); (S0 => A.0); (B, C, D, Z)),
    ((A, B, C, D, Z); (S0 => A.0, S1 => B.1); (C, D, Z)),
    ((A, B, C, D, Z); (S0 => A.0, S1 => B.1, S2 => C.2); (D, Z)),
    ((A, B, C, D, Z); (S0 => A.0, S1 => B.1, S2 => C.2, S3 => D.3); (Z)),
    ((A, B, C, D, Z); (S0 => A.0, S1 => B.1, S2 => C.2, S3 => D.3, S4 => Z.4); ()),
);
