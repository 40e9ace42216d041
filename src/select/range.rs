//! Ordered-range selectors.
//!
//! Each kind carries one bound and matches an interval of event values:
//!
//! | Kind        | Matches   |
//! |-------------|-----------|
//! | [`Ge`]      | `v >= x`  |
//! | [`Gt`]      | `v > x`   |
//! | [`Le`]      | `v <= x`  |
//! | [`Lt`]      | `v < x`   |
//!
//! The primitive queries are asymmetric on purpose: a `Ge` never orders
//! before a value and a `Le` never orders after one, which is what places a
//! sorted run of same-kind bounds so that range lookup returns exactly the
//! bounds whose interval contains the value.

use std::cmp::Ordering;

use super::Selector;

macro_rules! range_selector {
    (
        $(#[$meta:meta])*
        $name:ident, $builder:ident, $builder_doc:literal,
        before($b_self:ident, $b_value:ident) = $before:expr,
        after($a_self:ident, $a_value:ident) = $after:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<T>(T);

        impl<T> $name<T> {
            /// Wrap a bound value.
            pub fn new(bound: T) -> Self {
                Self(bound)
            }

            /// The carried bound.
            pub fn bound(&self) -> &T {
                &self.0
            }
        }

        #[doc = $builder_doc]
        pub fn $builder<T: Ord + Send + Sync + 'static>(bound: T) -> $name<T> {
            $name(bound)
        }

        impl<T: Ord + Send + Sync + 'static> Selector<T> for $name<T> {
            fn before_value(&self, value: &T) -> bool {
                let ($b_self, $b_value) = (&self.0, value);
                $before
            }

            fn after_value(&self, value: &T) -> bool {
                let ($a_self, $a_value) = (&self.0, value);
                $after
            }

            fn cmp_selector(&self, other: &Self) -> Ordering {
                self.0.cmp(&other.0)
            }
        }
    };
}

range_selector!(
    /// Matches values greater than or equal to the bound.
    Ge, ge, "Build a `>=` selector from a bound.",
    before(_bound, _value) = false,
    after(bound, value) = value < bound
);

range_selector!(
    /// Matches values strictly greater than the bound.
    Gt, gt, "Build a `>` selector from a bound.",
    before(_bound, _value) = false,
    after(bound, value) = value <= bound
);

range_selector!(
    /// Matches values less than or equal to the bound.
    Le, le, "Build a `<=` selector from a bound.",
    before(bound, value) = bound < value,
    after(_bound, _value) = false
);

range_selector!(
    /// Matches values strictly less than the bound.
    Lt, lt, "Build a `<` selector from a bound.",
    before(bound, value) = bound <= value,
    after(_bound, _value) = false
);
