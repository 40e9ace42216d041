//! Handler traits for subscription callbacks.

use crate::event::EventTuple;

/// A subscription callback over event shape `E`.
///
/// Implemented for closures and fns taking one reference per event
/// position, so the handler's argument list is what fixes the event shape a
/// subscription listens on:
///
/// ```rust
/// use selectbus::Bus;
///
/// let bus = Bus::new();
/// let _anchor = bus.subscribe(|code: &u32, message: &String| {
///     println!("{code}: {message}");
/// }, ());
/// ```
///
/// Handlers run synchronously on the publishing thread and may publish,
/// subscribe, and drop anchors reentrantly.
pub trait Handler<E: EventTuple>: Send + Sync + 'static {
    /// Invoke the handler with a borrowed event tuple.
    fn invoke(&self, event: &E);
}

macro_rules! impl_handler {
    ($( ($($elem:ident . $idx:tt),+) ),+ $(,)?) => {
        $(
            impl<Func, $($elem),+> Handler<($($elem,)+)> for Func
            where
                Func: Fn($(&$elem),+) + Send + Sync + 'static,
                $($elem: 'static,)+
            {
                fn invoke(&self, event: &($($elem,)+)) {
                    (self)($(&event.$idx),+)
                }
            }
        )+
    };
}

impl_handler!(
    (A.0),
    (A.0, B.1),
    (A.0, B.1, C.2),
    (A.0, B.1, C.2, D.3),
    (A.0, B.1, C.2, D.3, Z.4),
);
